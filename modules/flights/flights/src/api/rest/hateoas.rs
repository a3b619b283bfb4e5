//! Hypermedia links, derived from the path the request arrived on so they
//! stay correct wherever the router is nested.

use uuid::Uuid;

use crate::api::rest::dto::{LinkDto, LinksDto};

#[derive(Debug, Clone)]
pub struct LinkBuilder {
    /// Collection path without trailing slash; empty when mounted at `/`.
    base: String,
}

impl LinkBuilder {
    /// Builder for a request on the collection itself (`GET /`, `POST /`).
    #[must_use]
    pub fn for_collection(path: &str) -> Self {
        Self {
            base: path.trim_end_matches('/').to_owned(),
        }
    }

    /// Builder for a request on a single item (`/{id}`).
    #[must_use]
    pub fn for_item(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let base = trimmed.rsplit_once('/').map_or("", |(base, _)| base);
        Self {
            base: base.to_owned(),
        }
    }

    #[must_use]
    pub fn collection_href(&self) -> String {
        if self.base.is_empty() {
            "/".to_owned()
        } else {
            self.base.clone()
        }
    }

    #[must_use]
    pub fn item_href(&self, id: Uuid) -> String {
        format!("{}/{id}", self.base)
    }

    /// Full link set for a single flight.
    #[must_use]
    pub fn item_links(&self, id: Uuid) -> LinksDto {
        let item = self.item_href(id);
        let collection = self.collection_href();
        LinksDto {
            self_link: Some(link(item.clone())),
            list: Some(link(collection.clone())),
            add: Some(link(collection)),
            update: Some(link(item.clone())),
            remove: Some(link(item)),
        }
    }

    /// List entries only link to themselves.
    #[must_use]
    pub fn list_entry_links(&self, id: Uuid) -> LinksDto {
        LinksDto {
            self_link: Some(link(self.item_href(id))),
            ..LinksDto::default()
        }
    }
}

fn link(href: String) -> LinkDto {
    LinkDto { href }
}
