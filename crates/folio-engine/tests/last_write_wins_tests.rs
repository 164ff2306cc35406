//! Concurrent saves of one page: the later commit wins in full

mod common;

use std::sync::Arc;
use std::thread;

use folio_core::PageRepository;
use folio_core_types::RequestContext;
use folio_engine::UpsertPageRequest;

use common::{hero_tree, memory_cache, sqlite_site};

fn version(id: Option<String>, label: &str) -> UpsertPageRequest {
    UpsertPageRequest {
        id,
        description: format!("{} description", label),
        is_published: true,
        ..UpsertPageRequest::new("/contested", label)
    }
    .with_tree(&hero_tree("h", label))
    .unwrap()
}

#[test]
fn test_sequential_saves_replace_whole_document() {
    let (_dir, site) = sqlite_site(memory_cache());
    let coordinator = site.coordinator();
    let ctx = RequestContext::new();

    let base = coordinator.save(&ctx, version(None, "base")).unwrap().document;
    coordinator.save(&ctx, version(base.id.clone(), "first")).unwrap();
    let mut second = version(base.id.clone(), "second");
    second.is_published = false;
    coordinator.save(&ctx, second).unwrap();

    let stored = site.pages.get("/contested").unwrap();
    assert_eq!(stored.title, "second");
    assert_eq!(stored.description, "second description");
    assert_eq!(stored.tree, Some(hero_tree("h", "second")));
    assert!(!stored.is_published);
}

#[test]
fn test_concurrent_saves_never_mix_versions() {
    let (_dir, site) = sqlite_site(memory_cache());
    let ctx = RequestContext::new();
    let base = site
        .coordinator()
        .save(&ctx, version(None, "base"))
        .unwrap()
        .document;

    let site = Arc::new(site);
    let handles: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|label| {
            let site = Arc::clone(&site);
            let request = version(base.id.clone(), label);
            thread::spawn(move || {
                let ctx = RequestContext::new();
                for _ in 0..20 {
                    site.coordinator().save(&ctx, request.clone()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = site.pages.get("/contested").unwrap();
    assert!(stored.title == "left" || stored.title == "right");
    assert_eq!(stored.description, format!("{} description", stored.title));
    assert_eq!(stored.tree, Some(hero_tree("h", &stored.title)));
}
