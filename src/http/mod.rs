pub mod request;
pub mod response;
pub mod session;

pub use request::ApiRequest;
pub use response::ApiResponse;
pub use session::Session;
