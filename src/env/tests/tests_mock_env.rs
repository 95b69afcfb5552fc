//! Sanity checks for the recording `MockEnv` used across the unit tests.

#[cfg(test)]
mod tests {
    use crate::env::tests::helpers::{MockDirectory, MockEnv, init_tracing};
    use crate::env::{Directory, create_and_new_directory};

    /// # Scenario
    /// Open two handles for the same path and fsync each once.
    ///
    /// # Expected behavior
    /// The per-path counter sees both barriers.
    #[test]
    fn counters_are_shared_per_path() {
        init_tracing();

        let env = MockEnv::new();
        let a = create_and_new_directory(&env, "/db".as_ref(), true).unwrap();
        let b = create_and_new_directory(&env, "/db".as_ref(), false).unwrap();
        a.fsync().unwrap();
        b.fsync().unwrap();

        assert_eq!(env.fsync_count("/db"), 2);
        assert_eq!(env.created().len(), 1);
        assert_eq!(env.opened().len(), 2);
    }

    /// # Scenario
    /// Inject open and fsync failures.
    ///
    /// # Expected behavior
    /// The configured calls fail; failed fsyncs are not counted.
    #[test]
    fn injected_failures() {
        init_tracing();

        let env = MockEnv::new();
        env.fail_open("/broken");
        env.fail_fsync("/slow");

        assert!(create_and_new_directory(&env, "/broken".as_ref(), false).is_err());

        let dir = create_and_new_directory(&env, "/slow".as_ref(), false).unwrap();
        assert!(dir.fsync().is_err());
        assert_eq!(env.fsync_count("/slow"), 0);

        let standalone = MockDirectory::failing("/x");
        assert!(standalone.fsync().is_err());
        assert_eq!(standalone.fsync_count(), 0);
    }
}
