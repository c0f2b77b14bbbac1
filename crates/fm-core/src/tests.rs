//! Unit tests for fm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, FacilityId, NodeId};

    #[test]
    fn index_and_ordering() {
        assert_eq!(NodeId(42).index(), 42);
        assert!(NodeId(100) > NodeId(99));
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(FacilityId::from("s1").to_string(), "s1");
    }

    #[test]
    fn facility_ids_compare_by_value() {
        let a = FacilityId::new(String::from("c3b1"));
        let b = FacilityId::from("c3b1");
        assert_eq!(a, b);
        assert_ne!(a, FacilityId::from("c3b2"));
        assert_eq!(a.as_str(), "c3b1");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(3.5952, 98.6722);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(3.0, 98.0);
        let b = GeoPoint::new(4.0, 98.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn cardinal_bearings() {
        let o = GeoPoint::new(0.0, 0.0);
        assert!((o.bearing_deg(GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((o.bearing_deg(GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((o.bearing_deg(GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((o.bearing_deg(GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(3.6, 98.67).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn display_six_decimals() {
        assert_eq!(GeoPoint::new(3.6, 98.67).to_string(), "(3.600000, 98.670000)");
    }
}

#[cfg(test)]
mod facility {
    use crate::Category;

    #[test]
    fn source_codes() {
        assert_eq!(Category::from_code("SD"), Category::Primary);
        assert_eq!(Category::from_code("smp"), Category::LowerSecondary);
        assert_eq!(Category::from_code(" SMA "), Category::UpperSecondary);
        assert_eq!(Category::from_code("UpperSecondary"), Category::UpperSecondary);
    }

    #[test]
    fn unknown_codes_degrade_to_other() {
        assert_eq!(Category::from_code("SMK"), Category::Other);
        assert_eq!(Category::from_code(""), Category::Other);
        assert!(!Category::Other.is_recognized());
        assert!(Category::ALL.iter().all(|c| c.is_recognized()));
    }

    #[test]
    fn code_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::from_code(c.code()), c);
        }
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, GeoPoint, PlannerConfig};

    #[test]
    fn defaults() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.engine_timeout().as_secs(), 10);
        assert_eq!(cfg.home_center, GeoPoint::new(3.5952, 98.6722));
        assert_eq!((cfg.overview_zoom, cfg.focus_zoom), (13, 16));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = PlannerConfig { engine_timeout_ms: 0, ..PlannerConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn bad_center_rejected() {
        let cfg = PlannerConfig {
            home_center: GeoPoint::new(120.0, 0.0),
            ..PlannerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidCoordinate(_))));
    }

    #[test]
    fn inverted_zoom_rejected() {
        let cfg = PlannerConfig { overview_zoom: 17, ..PlannerConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
