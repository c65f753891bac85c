//! Database backed operations.

use crate::upload::FileStore;
use sea_orm::DbConn;

mod contract;
mod dashboard;
mod tenant;
mod unit;

pub use contract::*;
pub use dashboard::*;
pub use tenant::*;
pub use unit::*;

pub struct Service {
    conn: DbConn,
    files: FileStore,
}

impl Service {
    pub fn new(conn: DbConn, files: FileStore) -> Self {
        Self { conn, files }
    }

    pub fn db(&self) -> &DbConn {
        &self.conn
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }
}
