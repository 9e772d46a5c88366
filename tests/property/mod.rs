mod determinism;
mod invariants;
