//! Fresh node identifiers from a monotonic millisecond clock.

use chrono::Utc;

/// Hands out `<prefix>-<millis>` identifiers that never repeat for the
/// lifetime of the generator, even when several are requested within the
/// same millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier for which `taken` returns false.
    pub fn next_id(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        let mut stamp = Utc::now().timestamp_millis().max(self.last + 1);
        loop {
            let id = format!("{}-{}", prefix, stamp);
            if !taken(&id) {
                self.last = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_rapid_requests_when_generating_then_ids_are_unique() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id("node", |_| false);
        let b = ids.next_id("node", |_| false);
        let c = ids.next_id("node", |_| false);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.starts_with("node-"));
    }

    #[test]
    fn given_taken_id_when_generating_then_skips_it() {
        let mut ids = IdGenerator::new();
        let first = ids.next_id("arg", |_| false);
        let stamp: i64 = first.trim_start_matches("arg-").parse().unwrap();
        let blocked = format!("arg-{}", stamp + 1);
        let next = ids.next_id("arg", |id| id == blocked);
        assert_ne!(next, blocked);
        assert_ne!(next, first);
    }
}
