//! HTTP API handlers for voxsite-web

pub mod audio_files;
pub mod catalog;
pub mod health;
pub mod services;
pub mod site_content;
pub mod sse;
pub mod upload;

pub use audio_files::{delete_audio_file, list_audio_files, serve_manifest};
pub use catalog::{
    get_catalog, get_speakers, refresh_catalog, set_auto_refresh, update_catalog_entry,
};
pub use health::health_routes;
pub use services::{
    create_service, delete_service, list_services, reorder_services, update_service,
};
pub use site_content::{list_site_content, set_site_content};
pub use sse::event_stream;
pub use upload::upload_audio;
