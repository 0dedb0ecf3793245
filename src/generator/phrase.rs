//! Business-speak phrases used as record messages.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Adaptive", "Advanced", "Automated", "Balanced", "Centralized", "Configurable",
    "Cross-platform", "Customizable", "Decentralized", "Distributed", "Enhanced",
    "Ergonomic", "Extended", "Fault-tolerant", "Front-line", "Horizontal", "Innovative",
    "Integrated", "Managed", "Monitored", "Multi-layered", "Optimized", "Proactive",
    "Progressive", "Reactive", "Robust", "Seamless", "Secured", "Streamlined",
    "Synchronized", "Total", "Upgradable", "User-friendly", "Versatile", "Virtual",
];

const DESCRIPTORS: &[&str] = &[
    "24/7", "asynchronous", "bi-directional", "client-driven", "composite",
    "context-sensitive", "dedicated", "dynamic", "empowering", "encompassing",
    "fresh-thinking", "global", "heuristic", "high-level", "holistic", "incremental",
    "interactive", "logistical", "mission-critical", "modular", "multi-tasking",
    "needs-based", "next generation", "object-oriented", "real-time", "regional",
    "scalable", "stable", "systematic", "transitional", "upward-trending", "zero tolerance",
];

const NOUNS: &[&str] = &[
    "ability", "access", "adapter", "algorithm", "analyzer", "architecture", "benchmark",
    "capability", "circuit", "complexity", "database", "encoding", "firmware", "framework",
    "function", "hierarchy", "hub", "infrastructure", "initiative", "interface", "matrix",
    "middleware", "migration", "model", "moratorium", "paradigm", "pipeline", "policy",
    "portal", "protocol", "service-desk", "solution", "strategy", "throughput", "workforce",
];

/// Three-word phrase such as `Robust real-time middleware`.
pub fn catch_phrase<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = pick(ADJECTIVES, rng);
    let descriptor = pick(DESCRIPTORS, rng);
    let noun = pick(NOUNS, rng);
    format!("{adjective} {descriptor} {noun}")
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words[rng.gen_range(0..words.len())]
}
