use super::*;

#[test]
fn scrubber_maps_the_time_domain_onto_the_track() {
    assert_eq!(scrubber_x(0.0, 180.0, 50.0, 860.0), 50.0);
    assert_eq!(scrubber_x(180.0, 180.0, 50.0, 860.0), 910.0);
    assert_eq!(scrubber_x(90.0, 180.0, 50.0, 860.0), 480.0);
}

#[test]
fn scrubber_x_clamps_out_of_range_times() {
    assert_eq!(scrubber_x(-20.0, 180.0, 50.0, 860.0), 50.0);
    assert_eq!(scrubber_x(999.0, 180.0, 50.0, 860.0), 910.0);
}

#[test]
fn scrubber_time_inverts_the_mapping() {
    let t = scrubber_time(480.0, 180.0, 50.0, 860.0);
    assert!((t - 90.0).abs() < 1e-4);
}

#[test]
fn scrubber_time_clamps_beyond_the_track() {
    assert_eq!(scrubber_time(0.0, 180.0, 50.0, 860.0), 0.0);
    assert_eq!(scrubber_time(2000.0, 180.0, 50.0, 860.0), 180.0);
}

#[test]
fn scrubber_roundtrips_within_the_track() {
    for t in [0.0, 13.0, 90.0, 179.5, 180.0] {
        let x = scrubber_x(t, 180.0, 50.0, 860.0);
        let back = scrubber_time(x, 180.0, 50.0, 860.0);
        assert!((back - t).abs() < 1e-3, "t = {t}, back = {back}");
    }
}

#[test]
fn degenerate_track_is_harmless() {
    assert_eq!(scrubber_x(50.0, 0.0, 10.0, 100.0), 10.0);
    assert_eq!(scrubber_time(60.0, 180.0, 10.0, 0.0), 0.0);
}

#[test]
fn node_hit_covers_the_card_and_nothing_more() {
    let center = Pos2::new(100.0, 100.0);
    assert!(node_hit(center, 30.0, Pos2::new(100.0, 100.0)));
    assert!(node_hit(center, 30.0, Pos2::new(130.0, 70.0)));
    assert!(!node_hit(center, 30.0, Pos2::new(131.0, 100.0)));
    assert!(!node_hit(center, 30.0, Pos2::new(100.0, 131.0)));
}
