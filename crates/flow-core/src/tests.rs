//! Unit tests for flow-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, LaneIndex, LaneRef};

    #[test]
    fn classify_by_marker() {
        assert_eq!(EdgeId::parse("bottom"), EdgeId::Regular("bottom".into()));
        assert_eq!(EdgeId::parse(":center_0"), EdgeId::Internal(":center_0".into()));
        assert!(EdgeId::from(":a").is_internal());
        assert!(!EdgeId::from("a:b").is_internal());
    }

    #[test]
    fn as_str_keeps_marker() {
        let id = EdgeId::parse(":center_0");
        assert_eq!(id.as_str(), ":center_0");
        assert_eq!(id.to_string(), ":center_0");
        assert_eq!(EdgeId::parse(id.as_str()), id);
    }

    #[test]
    fn coarser_strips_last_segment() {
        assert_eq!(
            EdgeId::parse(":center_intersection_3").coarser(),
            Some(EdgeId::Internal(":center_intersection".into()))
        );
        assert_eq!(EdgeId::parse(":center").coarser(), None);
        assert_eq!(EdgeId::parse("top_1").coarser(), None);
    }

    #[test]
    fn lane_id_split_at_last_underscore() {
        let lane = LaneRef::from_lane_id("right_top_1").unwrap();
        assert_eq!(lane, LaneRef::new("right_top", 1));
        assert_eq!(lane.to_string(), "right_top_1");

        let internal = LaneRef::from_lane_id(":B_0_2").unwrap();
        assert_eq!(internal.edge, EdgeId::Internal(":B_0".into()));
        assert_eq!(internal.lane, LaneIndex(2));
        assert_eq!(internal.lane.to_string(), "2");
    }

    #[test]
    fn malformed_lane_ids_rejected() {
        assert!(LaneRef::from_lane_id("nounderscore").is_err());
        assert!(LaneRef::from_lane_id("edge_x").is_err());
        assert!(LaneRef::from_lane_id("_3").is_err());
        assert!(LaneRef::from_lane_id("edge_-1").is_err());
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{CoreError, NetworkConfig, RetryPolicy};

    #[test]
    fn default_retry_policy() {
        let p = RetryPolicy::default();
        assert_eq!(p.attempts, 10);
        assert_eq!(p.delay(), Duration::from_secs(1));
        assert_eq!(p.max_wait(), Duration::from_secs(10));
    }

    #[test]
    fn huge_delays_saturate() {
        assert_eq!(RetryPolicy::new(1, Duration::MAX).delay_ms, u64::MAX);

        let loaded = RetryPolicy { attempts: u32::MAX, delay_ms: u64::MAX };
        assert_eq!(loaded.max_wait(), Duration::MAX);
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = NetworkConfig::default();
        assert!(cfg.edge_starts.is_none());
        assert!(cfg.internal_edge_starts.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn builder_setters() {
        let cfg = NetworkConfig::new()
            .with_edge_starts([("bottom", 0.0), ("top", 50.0)])
            .with_internal_edge_starts([(":center", 25.0)])
            .with_retry(RetryPolicy::new(3, Duration::from_millis(5)));
        assert_eq!(cfg.edge_starts.as_ref().unwrap()[1], ("top".to_string(), 50.0));
        assert_eq!(cfg.internal_edge_starts.as_ref().unwrap().len(), 1);
        assert_eq!(cfg.retry.delay_ms, 5);
        cfg.validate().unwrap();
    }

    #[test]
    fn zero_attempts_rejected() {
        let cfg = NetworkConfig::new().with_retry(RetryPolicy::new(0, Duration::ZERO));
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn duplicate_and_non_finite_starts_rejected() {
        let dup = NetworkConfig::new().with_edge_starts([("a", 0.0), ("a", 10.0)]);
        assert!(matches!(dup.validate(), Err(CoreError::Config(_))));

        let nan = NetworkConfig::new().with_internal_edge_starts([(":a", f64::NAN)]);
        assert!(matches!(nan.validate(), Err(CoreError::Config(_))));
    }
}
