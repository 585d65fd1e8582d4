use ideatree::hierarchy::HealthCheck;
use ideatree::{
    codec, render_markdown, similarity_network, EmbeddingStore, JsonFileCache, MemoryStore,
    OutlineService,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=ideatree=debug shows clustering and scoring decisions.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = MemoryStore::default();
    let ideas = [
        ("gpu-fans", "Tune the GPU fan curve to cut noise"),
        ("quiet-gpu", "Fan noise reduction for GPUs under load"),
        ("cooler", "Aftermarket GPU cooler with quiet fans"),
        ("starter", "Sourdough starter feeding schedule"),
        ("crumb", "Open crumb sourdough bread with a wet dough"),
        ("levain", "Stiff levain for sourdough bread"),
        ("borrow", "Explain the borrow checker through lifetimes"),
        ("async", "Async runtimes and the borrow checker"),
        ("kite", "Kite-powered boat for crossing lakes"),
    ];
    for (name, description) in ideas {
        store.insert(name, &codec::encode(name, description))?;
    }

    let dir = std::env::temp_dir().join("ideatree-demo");
    let cache = JsonFileCache::new(dir.join("outline.json"));
    let service = OutlineService::from_env(store, cache);

    let outline = service.rebuild()?;
    println!("{}", render_markdown(&outline.nodes));
    println!("{}", outline.health_check());
    println!(
        "strategy={:?} depth={} cached_at={}",
        outline.stats.strategy,
        outline.stats.depth,
        service.cache().path().display()
    );

    for (name, description) in service.similar("fan-idea", "Silent GPU fans", 3)? {
        println!("similar: {name} : {description}");
    }

    let start = codec::encode("gpu-fans", "Tune the GPU fan curve to cut noise");
    let graph = similarity_network(service.store(), "gpu-fans", &start, 2)?;
    println!(
        "network: n_nodes={} n_edges={}",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(())
}
