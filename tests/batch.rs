use std::sync::Arc;

use analytic_tracer::hit::MaterialKind;
use analytic_tracer::parallel::trace_batch;
use analytic_tracer::scene::{ parse_rays, parse_world };

const SCENE: &str = r#"{
    "shapes": [
        {
            "type": "plane",
            "normal": [0, 1, 0],
            "offset": -3,
            "tag": { "object_id": 1 }
        },
        {
            "type": "capped_cone",
            "k": 0.5,
            "transform": [ { "translate": [6, 0, 0] } ],
            "tag": { "object_id": 2, "material": "metal" }
        }
    ],
    "solids": [
        {
            "type": "difference",
            "left": { "type": "sphere", "tag": { "object_id": 10, "color": { "r": 1, "g": 0, "b": 0 } } },
            "right": {
                "type": "sphere",
                "transform": [ { "translate": [0, 0, 1] } ],
                "tag": { "object_id": 11, "material": "clear_coat" }
            }
        },
        {
            "type": "union",
            "transform": [ { "translate": [-6, 0, 0] }, { "scale": [0.5, 0.5, 0.5] } ],
            "left": { "type": "box" },
            "right": { "type": "capsule", "height": 1, "tag": { "object_id": 21 } }
        }
    ]
}"#;

const RAYS: &str = r#"[
    { "origin": [0, 0, -5], "direction": [0, 0, 1] },
    { "origin": [0, 0, 5], "direction": [0, 0, -1] },
    { "origin": [6, 5, 0], "direction": [0, -1, 0] },
    { "origin": [-6, 5, 0], "direction": [0, -1, 0] },
    { "origin": [20, 0, 0], "direction": [0, 0, 1] },
    { "origin": [20, 5, 0], "direction": [0, -1, 0] }
]"#;

#[test]
fn scene_to_hits() {
    let world = parse_world(SCENE).unwrap();
    let rays = parse_rays(RAYS).unwrap();
    let hits = trace_batch(Arc::new(world), rays, 3);

    assert_eq!(hits.len(), 6);

    // Front of the carved sphere.
    let front = hits[0].unwrap();
    approx::assert_abs_diff_eq!(front.t, 4.0, epsilon = 1e-9);
    assert_eq!(front.tag.object_id, 10);
    assert_eq!(front.tag.color.g, 0.0);

    // From behind, the first surface is the cavity wall.
    let back = hits[1].unwrap();
    approx::assert_abs_diff_eq!(back.t, 5.0, epsilon = 1e-9);
    assert_eq!(back.tag.object_id, 11);
    assert_eq!(back.tag.material, MaterialKind::ClearCoat);
    approx::assert_abs_diff_eq!(back.normal.z, 1.0, epsilon = 1e-9);

    // Top cap of the cone.
    let cone = hits[2].unwrap();
    approx::assert_abs_diff_eq!(cone.t, 4.0, epsilon = 1e-9);
    assert_eq!(cone.tag.material, MaterialKind::Metal);

    // Half-size capsule pokes out of the box: its top is at y = 1.
    let capsule = hits[3].unwrap();
    approx::assert_abs_diff_eq!(capsule.t, 4.0, epsilon = 1e-9);
    assert_eq!(capsule.tag.object_id, 21);

    // Parallel to the floor and clear of everything.
    assert!(hits[4].is_none());

    // Straight down onto the floor.
    let floor = hits[5].unwrap();
    approx::assert_abs_diff_eq!(floor.t, 8.0, epsilon = 1e-9);
    assert_eq!(floor.tag.object_id, 1);
}

#[test]
fn hits_serialize_with_null_for_misses() {
    let world = parse_world(SCENE).unwrap();
    let rays = parse_rays(RAYS).unwrap();
    let hits = trace_batch(Arc::new(world), rays, 1);

    let json: serde_json::Value = serde_json::to_value(&hits).unwrap();
    let entries = json.as_array().unwrap();

    assert!(entries[4].is_null());
    assert_eq!(entries[0]["tag"]["object_id"], 10);
    assert_eq!(entries[2]["tag"]["material"], "metal");
    assert!(entries[0]["t"].is_number());
}
