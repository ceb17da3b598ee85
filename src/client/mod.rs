//! Terminal counterpart of the single-page frontend: session gate, list/search/
//! pagination over a fetched snapshot, and the add/edit forms.

pub mod api;
pub mod form;
pub mod list;
pub mod notice;
pub mod session;
pub mod validation;
pub mod view;

pub use api::{ClientError, HttpRecordsApi, RecordsApi};
pub use notice::Notice;
