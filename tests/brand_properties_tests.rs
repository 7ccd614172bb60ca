// Copyright (c) 2025 - Cowboy AI, LLC.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use cim_brand::{Brand, BrandDescriptor, BrandError};

#[derive(Debug, Default)]
struct Request {
    headers: Vec<(String, String)>,
}

fn descriptor(kind: &str) -> BrandDescriptor {
    BrandDescriptor::new().with("kind", kind)
}

#[test]
fn fresh_brand_does_not_have_fresh_object() {
    let brand = Brand::<Request>::new(descriptor("external"));
    assert!(!brand.has(&Arc::new(Request::default())));
}

#[test]
fn branded_object_passes_has_and_assert() {
    let brand = Brand::<Request>::new(descriptor("external"));
    let req = Arc::new(Request::default());

    brand.brand(&req).unwrap();
    assert!(brand.has(&req));
    brand.assert(&req).unwrap();
}

#[test]
fn second_branding_fails_without_corrupting_first() {
    let brand = Brand::<Request>::new(descriptor("external"));
    let req = Arc::new(Request::default());

    brand.brand(&req).unwrap();
    let err = brand.brand(&req).unwrap_err();
    assert!(matches!(err, BrandError::AlreadyBranded { .. }));
    assert!(brand.has(&req));
}

#[test]
fn assert_on_unbranded_object_fails() {
    let brand = Brand::<Request>::new(descriptor("external"));
    let err = brand.assert(&Arc::new(Request::default())).unwrap_err();
    assert!(matches!(err, BrandError::NotBranded { .. }));
}

#[test]
fn failing_callback_leaves_object_unbranded() {
    let brand = Brand::<Request>::with_callback(descriptor("external"), |_, _| {
        anyhow::bail!("callback failed")
    });
    let req = Arc::new(Request::default());

    assert!(brand.brand(&req).is_err());
    assert!(!brand.has(&req));
}

#[test]
fn callback_observes_branded_state() {
    let slot: Arc<OnceLock<Brand<Request>>> = Arc::new(OnceLock::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let (inner_slot, inner_seen) = (Arc::clone(&slot), Arc::clone(&seen));
    let brand = Brand::<Request>::with_callback(descriptor("external"), move |req, _| {
        if let Some(brand) = inner_slot.get() {
            inner_seen.lock().unwrap().push(brand.has(req));
        }
        Ok(())
    });
    assert!(slot.set(brand.clone()).is_ok());

    brand.brand(&Arc::new(Request::default())).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![true]);
}

#[test]
fn merge_requires_every_constituent() {
    let a = Brand::<Request>::new(descriptor("a"));
    let b = Brand::<Request>::new(descriptor("b"));
    let merged = a.merge(&b);

    let only_a = Arc::new(Request::default());
    a.brand(&only_a).unwrap();
    assert!(!merged.has(&only_a));

    let both = Arc::new(Request::default());
    a.brand(&both).unwrap();
    b.brand(&both).unwrap();
    assert!(merged.has(&both));

    let via_merge = Arc::new(Request::default());
    merged.brand(&via_merge).unwrap();
    assert!(a.has(&via_merge));
    assert!(b.has(&via_merge));
}

#[test]
fn refine_invokes_original_and_new_callbacks() {
    let calls = Arc::new(Mutex::new(Vec::new()));

    let base_calls = Arc::clone(&calls);
    let base = Brand::<Request>::with_callback(descriptor("user"), move |_, d| {
        base_calls.lock().unwrap().push(d.to_string());
        Ok(())
    });

    let refined_calls = Arc::clone(&calls);
    let refined = base.refine_with(
        BrandDescriptor::new().with("role", "admin"),
        move |_, d| {
            refined_calls.lock().unwrap().push(d.to_string());
            Ok(())
        },
    );

    let req = Arc::new(Request::default());
    refined.brand(&req).unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            r#"{"kind":"user"}"#.to_string(),
            r#"{"kind":"user","role":"admin"}"#.to_string(),
        ]
    );
    assert!(base.has(&req));
    assert!(refined.has(&req));
}

#[test]
fn external_request_scenario() {
    let brand = Brand::<Request>::new(
        BrandDescriptor::from_value(serde_json::json!({"kind": "external"})).unwrap(),
    );
    let req = Arc::new(Request {
        headers: vec![("x-forwarded-for".into(), "10.0.0.1".into())],
    });

    let returned = brand.brand(&req).unwrap();
    assert!(Arc::ptr_eq(returned, &req));
    assert_eq!(returned.headers.len(), 1);
    assert!(brand.has(&req));
    assert!(brand.brand(&req).unwrap_err().is_already_branded());

    let req2 = Arc::new(Request::default());
    assert!(!brand.has(&req2));
}

#[test]
fn registry_does_not_keep_objects_alive() {
    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let drops = Arc::new(AtomicUsize::new(0));
    let a = Brand::<Tracked>::new(descriptor("a"));
    let b = Brand::<Tracked>::new(descriptor("b"));
    let merged = a.merge(&b);

    let object = Arc::new(Tracked(Arc::clone(&drops)));
    merged.brand(&object).unwrap();
    assert_eq!(Arc::strong_count(&object), 1);

    drop(object);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(merged.purge(), 2);
}

#[test]
fn concurrent_branding_admits_exactly_one() {
    let callbacks = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&callbacks);
    let brand = Brand::<Request>::with_callback(descriptor("external"), move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let req = Arc::new(Request::default());

    let successes = thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| brand.brand(&req).is_ok()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
    assert!(brand.has(&req));
}

#[test]
fn trait_object_brands_cover_mixed_types() {
    trait Resource: Send + Sync {}
    struct File;
    struct Socket;
    impl Resource for File {}
    impl Resource for Socket {}

    let audited = Brand::<dyn Resource>::new(descriptor("audited"));
    let file: Arc<dyn Resource> = Arc::new(File);
    let socket: Arc<dyn Resource> = Arc::new(Socket);

    audited.brand(&file).unwrap();
    assert!(audited.has(&file));
    assert!(!audited.has(&socket));
}

#[test]
fn brands_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Brand<Request>>();
}
