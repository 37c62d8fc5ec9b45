use flowdeck::catalog::Catalog;
use flowdeck::model::{EdgeRef, PayloadView, SimulationStep, Trend};
use flowdeck::script::{DEFAULT_REGION, REGIONS, build_script, validate_script};

#[test]
fn test_script_step_ids_are_positional() {
    let steps = build_script(DEFAULT_REGION);
    for (i, s) in steps.iter().enumerate() {
        assert_eq!(s.step_id, i);
    }
}

#[test]
fn test_first_step_has_no_edge_and_region_log() {
    let steps = build_script("São Paulo");
    let first = &steps[0];
    assert_eq!(first.node, "consumer_app");
    assert!(first.edge.is_none());
    assert_eq!(first.log, "Usuário abre App em São Paulo");
}

#[test]
fn test_region_is_interpolated() {
    let steps = build_script("Belo Horizonte");
    assert_eq!(steps[0].log, "Usuário abre App em Belo Horizonte");
}

#[test]
fn test_every_later_step_traverses_an_edge_into_its_node() {
    let steps = build_script(DEFAULT_REGION);
    for s in &steps[1..] {
        let edge = s.edge.as_ref().unwrap_or_else(|| {
            panic!("step {} has no edge", s.step_id);
        });
        assert_eq!(edge.to, s.node, "step {} edge must end at its node", s.step_id);
    }
}

#[test]
fn test_script_validates_against_builtin_catalog() {
    let catalog = Catalog::builtin();
    for region in REGIONS {
        let steps = build_script(region);
        assert!(steps.len() >= 10);
        validate_script(&catalog, &steps).unwrap();
    }
}

#[test]
fn test_validate_rejects_unknown_node() {
    let catalog = Catalog::builtin();
    let mut steps = build_script(DEFAULT_REGION);
    steps[0].node = "ghost".into();
    let err = validate_script(&catalog, &steps).unwrap_err().to_string();
    assert!(err.contains("unknown node"), "{err}");
}

#[test]
fn test_validate_rejects_unknown_edge() {
    let catalog = Catalog::builtin();
    let mut steps = build_script(DEFAULT_REGION);
    steps[1].edge = Some(EdgeRef::new("consumer_app", "bigquery"));
    assert!(validate_script(&catalog, &steps).is_err());
}

#[test]
fn test_script_contains_ranking_and_roi_payloads() {
    let steps = build_script(DEFAULT_REGION);
    let has_ranking = steps
        .iter()
        .filter_map(|s: &SimulationStep| s.payload.as_ref())
        .any(|p| p.view == PayloadView::Ranking);
    assert!(has_ranking);
    let has_downward_roi = steps
        .iter()
        .filter_map(|s| s.payload.as_ref())
        .filter_map(|p| p.roi.as_ref())
        .any(|r| r.trend == Trend::Down);
    assert!(has_downward_roi);
}
