//! Attachment records as supplied by the persistence layer.
//!
//! These are plain values. Resolving the owning message and folder belongs to
//! a `RecordProvider`; the fetcher only ever reads them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::decode::TransferEncoding;
use crate::error::RecordError;
use crate::pool::Account;

/// One attachment row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    pub id: String,
    /// Declared size in bytes.
    pub size: u64,
    /// MIME part to fetch; `None` means the whole message body.
    pub part_id: Option<String>,
    pub version: Option<i32>,
    pub charset: Option<String>,
    /// Content-Transfer-Encoding label, free-form.
    pub encoding: Option<String>,
    pub filename: Option<String>,
    pub message_id: String,
    pub account_id: String,
    pub content_type: Option<String>,
    pub content_id: Option<String>,
}

impl AttachmentDescriptor {
    pub fn transfer_encoding(&self) -> TransferEncoding {
        TransferEncoding::from_label(self.encoding.as_deref().unwrap_or(""))
    }

    /// JSON representation served to API clients (`object: "file"`).
    ///
    /// Charset and version are storage details and stay out of the view.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "size": self.size,
            "object": "file",
            "part_id": self.part_id,
            "encoding": self.encoding,
            "filename": self.filename,
            "message_id": self.message_id,
            "account_id": self.account_id,
            "content_type": self.content_type,
            "content_id": self.content_id,
        })
    }
}

/// Where an attachment's message lives on the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    pub account: Account,
    /// Remote folder holding the message.
    pub container: String,
    /// UID of the message within `container`.
    pub locator: u32,
}

/// Read-only access to attachment rows and their owning message and folder.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    async fn attachment(&self, id: &str) -> Result<AttachmentDescriptor, RecordError>;

    /// Resolve the account, folder and UID of the message owning `descriptor`.
    async fn locate(&self, descriptor: &AttachmentDescriptor) -> Result<FetchContext, RecordError>;
}
