//! Request model: method, parameters, base URL, and the resolved plan.

mod base_url;
mod header;
mod method;
mod plan;
mod query;

pub use base_url::BaseUrl;
pub use header::HeaderParam;
pub use method::HttpMethod;
pub use plan::RequestPlan;
pub use query::{QueryParam, QueryParams};
