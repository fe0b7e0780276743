use std::any::Any;

use ndroi::dispatch::{self, Owner};
use ndroi::units::display_time_with_units;
use ndroi::utils::{count_intersecting, number_of_points};
use ndroi::{
    BooleanMask, BoxRoi, EllipseRoi, IntRect, MaskBuilder, MaskConfig, MaskRoi, Overlay, Rank,
    RealPoint, RealRect, Roi, RoiDocument, RoiError,
};

#[derive(Debug)]
struct PanelOverlay {
    panel: String,
}

impl Overlay for PanelOverlay {
    fn name(&self) -> &str {
        "panel"
    }

    fn options_panel(&self) -> Option<&dyn Any> {
        Some(&self.panel)
    }
}

fn full_plane(w: i32, h: i32) -> BooleanMask {
    BooleanMask::from_fn(IntRect::new(Rank::Two, &[0, 0], &[w, h]), |_| true)
}

#[test]
fn three_identical_planes_stack_into_twelve_points() {
    let bounds = IntRect::new(Rank::Three, &[0, 0, 0], &[2, 2, 3]);
    let mask = BooleanMask::from_slices(bounds, vec![full_plane(2, 2), full_plane(2, 2), full_plane(2, 2)])
        .unwrap();

    assert_eq!(mask.points().len(), 12);
    assert_eq!(mask.bounds().sizes(), &[2, 2, 3]);
    assert_eq!(mask.optimized_bounds(), bounds);
}

#[test]
fn hours_minutes_seconds() {
    assert_eq!(display_time_with_units(3_661_000.0, false), "1h 1min 1sec");
}

#[test]
fn set_position_without_translation_is_a_no_op() {
    let mut roi = MaskRoi::new(full_plane(3, 3));
    let before = roi.bounds();

    assert!(!roi.can_translate());
    assert!(!roi.can_set_position());
    roi.set_position(&RealPoint::new(Rank::Two, &[10.0, 10.0]));

    assert_eq!(roi.bounds(), before);
}

#[test]
fn cross_rank_queries_resolve_in_one_hop() {
    let area = MaskRoi::new(full_plane(4, 4));
    let volume = BoxRoi::new(RealRect::new(
        Rank::Five,
        &[0.0, 0.0, 0.0, 0.0, 0.0],
        &[8.0, 8.0, 2.0, 2.0, 1.0],
    ));

    assert_eq!(dispatch::resolve(area.rank(), volume.rank()).owner, Owner::Rhs);
    assert!(volume.contains(&area));
    assert!(!area.contains(&volume));
    assert!(area.intersects(&volume));
    assert!(volume.intersects(&area));
}

#[test]
fn plane_away_from_origin_misses_lifted_operand() {
    let area = MaskRoi::new(full_plane(4, 4));
    let shifted = BoxRoi::new(RealRect::new(
        Rank::Three,
        &[0.0, 0.0, 3.0],
        &[8.0, 8.0, 2.0],
    ));

    assert!(!shifted.intersects(&area));
    assert!(!area.intersects(&shifted));
}

#[test]
fn exact_box_tests_agree_with_masks() {
    let outer = BoxRoi::new(RealRect::new(Rank::Three, &[0.0, 0.0, 0.0], &[6.0, 6.0, 6.0]));
    let inner = BoxRoi::new(RealRect::new(Rank::Three, &[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0]));

    assert!(outer.contains(&inner));
    assert!(outer.boolean_mask(false).contains(&inner.boolean_mask(false)));
    assert!(!inner.contains(&outer));
    assert!(!inner.boolean_mask(false).contains(&outer.boolean_mask(false)));
}

#[test]
fn five_dimensional_slices_outside_bounds_are_empty() {
    let roi = BoxRoi::new(RealRect::new(
        Rank::Five,
        &[0.0, 0.0, 1.0, 2.0, 0.0],
        &[3.0, 3.0, 2.0, 1.0, 2.0],
    ));

    let plane = roi.mask_at(&[1, 2, 1], true);
    assert_eq!(plane.rank(), Rank::Two);
    assert_eq!(plane.cardinality(), 9);

    let missing = roi.mask_at(&[1, 9, 1], true);
    assert_eq!(missing.rank(), Rank::Two);
    assert!(missing.is_empty());

    let volume = roi.mask_at(&[2, 0], true);
    assert_eq!(volume.rank(), Rank::Three);
    assert_eq!(volume.cardinality(), 18);
}

#[test]
fn translation_moves_masks() {
    let mut roi = EllipseRoi::new(4.0, 4.0, 2.0, 2.0);
    let before = roi.boolean_mask(false).cardinality();
    roi.translate(&RealPoint::new(Rank::Two, &[10.0, 0.0]));

    let mask = roi.boolean_mask(false);
    assert_eq!(mask.cardinality(), before);
    assert_eq!(roi.position().coords(), &[12, 2]);
    assert!((number_of_points(&roi) - 4.0 * std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn builder_budget_from_config() {
    let config: MaskConfig = serde_json::from_str(r#"{"max_cells": 100}"#).unwrap();
    let builder = MaskBuilder::new(config);
    let roi = BoxRoi::new(RealRect::new(Rank::Two, &[0.0, 0.0], &[20.0, 20.0]));

    match builder.build(&roi, true) {
        Err(RoiError::MaskTooLarge { cells, limit }) => {
            assert_eq!(cells, 400);
            assert_eq!(limit, 100);
        }
        other => panic!("expected refusal, got {:?}", other.map(|m| m.cardinality())),
    }
}

#[test]
fn selection_panel_workflow() {
    let mut doc = RoiDocument::new();
    let boxed = doc.add(Box::new(
        BoxRoi::new(RealRect::new(Rank::Two, &[0.0, 0.0], &[4.0, 4.0])).with_overlay(Box::new(
            PanelOverlay {
                panel: "line width".to_string(),
            },
        )),
    ));
    let ellipse = doc.add(Box::new(EllipseRoi::new(3.0, 3.0, 2.0, 1.0)));
    let painted = doc.add(Box::new(MaskRoi::new(full_plane(3, 3))));

    let single = doc.summarize(&[boxed]);
    assert!(single.has_options);
    assert!(!doc.summarize(&[boxed, ellipse]).has_options);

    doc.set_opacity(&[boxed, ellipse, painted], 2.0);
    for roi in doc.iter() {
        assert_eq!(roi.attributes().opacity(), 1.0);
    }

    let moved = doc.translate_selection(&[boxed, painted], &RealPoint::new(Rank::Two, &[1.0, 1.0]));
    assert_eq!(moved, 1);

    let target = doc.get(ellipse).unwrap();
    assert_eq!(count_intersecting(target, doc.rois()), 2);
}
