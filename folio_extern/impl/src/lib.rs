pub mod contact;
mod http;
pub mod resend;
