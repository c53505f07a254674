use perfect_kv::{BloomFilter, PhfBuilder, PhfTable};
use std::collections::HashMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Minimal Perfect Hash Table Demo");
    println!("===============================\n");

    // Build a table from a thousand path-style keys, the kind of static
    // mapping this structure is made for.
    let mut data = HashMap::new();
    for i in 0..1000 {
        data.insert(
            format!("/articles/archive/post-{:04}", i),
            format!("20230101{:06}", i),
        );
    }
    println!("Created {} key-value pairs", data.len());

    let keys: Vec<String> = data.keys().cloned().collect();
    let (table, stats) = PhfBuilder::with_entries(data).build_with_stats()?;
    println!("Built minimal perfect hash table:");
    println!("  slots:             {}", table.len());
    println!("  multi-key buckets: {}", stats.multi_key_buckets);
    println!("  singleton buckets: {}", stats.singleton_buckets);
    println!("  largest bucket:    {}", stats.max_bucket_size);
    println!("  largest seed:      {}", stats.max_seed);
    println!("  rejected seeds:    {}", stats.rejected_seeds);
    println!("  memory:            ~{} bytes", table.memory_usage_bytes());

    println!("\nLookups (two hash evaluations each):");
    for key in [
        "/articles/archive/post-0000",
        "/articles/archive/post-0042",
        "/articles/archive/post-0999",
    ] {
        println!("  {} => {}", key, table.get(key)?);
    }

    // The table alone can't reject unknown keys - that's the filter's job.
    let mut filter = BloomFilter::new(keys.len(), 0.0001);
    for key in &keys {
        filter.add(key);
    }
    println!("\nMembership filter ({} bits, {} probes):", filter.num_bits(), filter.num_hashes());
    for key in ["/articles/archive/post-0500", "/articles/archive/missing"] {
        if filter.contains(key) {
            println!("  {} => {}", key, table.get(key)?);
        } else {
            println!("  {} => not in the key set", key);
        }
    }

    let path = "/tmp/perfect_kv_demo.bin";
    table.save_to_file(path)?;
    let loaded: PhfTable<String> = PhfTable::load_from_file(path)?;
    println!("\nSaved and reloaded table verbatim: {} slots, no rebuild", loaded.len());
    std::fs::remove_file(path).ok();

    println!("\nJSON form (first 80 chars): {}...", &table.to_json()?[..80]);

    Ok(())
}
