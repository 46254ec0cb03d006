//! tb-mail: reminder mail adapter for taskbell
//!
//! Provides the production SMTP sender (real delivery behind the `smtp`
//! feature) and an in-memory fake for tests. Both implement
//! `tb_core::Mailer`.

pub mod error;
pub mod memory;
pub mod send;

pub use error::{MailError, Result};
pub use memory::MemoryMailer;
pub use send::EmailSender;
