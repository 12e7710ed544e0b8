/// Generation counter for a component's fetches. Each fetch takes a token
/// from [`RequestEpoch::begin`]; a response is applied only while its token
/// is still current, so a late answer for a previous account never
/// overwrites fresher state.
#[derive(Debug, Default)]
pub struct RequestEpoch {
    current: u64,
}

impl RequestEpoch {
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let mut epoch = RequestEpoch::default();
        let first = epoch.begin();
        assert!(epoch.is_current(first));

        let second = epoch.begin();
        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
    }
}
