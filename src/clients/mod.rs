pub mod anilist;
pub mod cache;
pub mod error;
pub mod queries;
pub mod retry;
pub mod transport;

pub use anilist::{AnilistClient, ClientOptions};
pub use cache::{CachePattern, TtlCache};
pub use error::ClientError;
pub use retry::{RetryOptions, with_retry};
pub use transport::{GraphqlTransport, HttpTransport, UpstreamReply};
