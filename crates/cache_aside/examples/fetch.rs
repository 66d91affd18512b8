// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache-aside fetches against an in-memory store.
//!
//! Shows a plain entry with expiration, a hash-field entry and JSON decoding.

use std::time::Duration;

use cache_aside::{CacheEntry, Destination, MockStore};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Profile {
    name: String,
    visits: u32,
}

async fn load_profile() -> Result<String, std::io::Error> {
    println!("  (generating profile)");
    Ok(r#"{"name": "ada", "visits": 3}"#.to_string())
}

fn main() -> Result<(), cache_aside::Error> {
    futures::executor::block_on(async {
        let store = MockStore::new();

        let profile = CacheEntry::with_ttl(&store, "profile:ada", load_profile, Duration::from_secs(300));
        for _ in 0..2 {
            let mut out = Profile::default();
            profile.fetch(Destination::json(&mut out)).await?;
            println!("profile: {} ({} visits)", out.name, out.visits);
        }

        let counter = CacheEntry::hash_field(&store, "counters", "ada", || async {
            Ok::<_, std::io::Error>("12345".to_string())
        });
        let mut count = 0_i64;
        counter.fetch(&mut count).await?;
        println!("counter: {count}");

        println!("store saw {} commands", store.operations().len());
        Ok(())
    })
}
