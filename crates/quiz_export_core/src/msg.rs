use crate::{PageFetchResult, PageIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run at page 0.
    Start,
    /// The page body arrived with a success status.
    PageLoaded { page: PageIndex, body: String },
    /// The server reported that the page does not exist.
    PageMissing { page: PageIndex },
    /// Transport failure, unexpected status, or undecodable body.
    FetchFailed { page: PageIndex, reason: String },
    /// Question parser finished with the page body.
    PageParsed { page: PageIndex, result: PageFetchResult },
}
