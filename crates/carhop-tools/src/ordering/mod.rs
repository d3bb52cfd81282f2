//! The five ordering tools exposed to the conversational agent.

pub mod add_item;
pub mod create_order;
pub mod get_order;
pub mod modify_item;
pub mod remove_item;

use std::sync::Arc;

use carhop_core::ledger::OrderLedger;

use crate::traits::OrderTool;

pub use add_item::AddItemTool;
pub use create_order::CreateOrderTool;
pub use get_order::GetOrderTool;
pub use modify_item::ModifyItemTool;
pub use remove_item::RemoveItemTool;

/// The full ordering tool set over one ledger.
pub fn default_tools(ledger: Arc<dyn OrderLedger>) -> Vec<Arc<dyn OrderTool>> {
    vec![
        Arc::new(CreateOrderTool::new(Arc::clone(&ledger))),
        Arc::new(AddItemTool::new(Arc::clone(&ledger))),
        Arc::new(RemoveItemTool::new(Arc::clone(&ledger))),
        Arc::new(ModifyItemTool::new(Arc::clone(&ledger))),
        Arc::new(GetOrderTool::new(ledger)),
    ]
}
