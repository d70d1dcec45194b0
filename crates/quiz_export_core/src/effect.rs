use crate::PageIndex;

/// IO the driver must perform on behalf of the state machine, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage { page: PageIndex },
    ParsePage { page: PageIndex, body: String },
    /// Wait the inter-page delay before the next fetch.
    Throttle,
}
