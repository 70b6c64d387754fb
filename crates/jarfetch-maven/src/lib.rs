//! Maven repository protocol: artifact coordinates, remote URL layout,
//! `maven-metadata.xml` and POM parsing, HTTP transport, checksum
//! verification, and the content-addressed local store.

pub mod checksum;
pub mod coordinate;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod repository;
pub mod store;
pub mod transport;
