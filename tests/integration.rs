use voroblock::{decompose, rebuild, BoundingBox, Mulberry32Sampler, Params, RefineOptions};

fn tetrahedral_seeds() -> Vec<[f64; 3]> {
    vec![
        [2.5, 2.5, 2.5],
        [-2.5, -2.5, 2.5],
        [-2.5, 2.5, -2.5],
        [2.5, -2.5, -2.5],
    ]
}

#[test]
fn test_tetrahedral_seeds_stay_in_box() {
    let bounds = BoundingBox::new([10.0, 10.0, 10.0]);
    let options = RefineOptions { iterations: 0, weld: true };
    let d = decompose(&bounds, &tetrahedral_seeds(), 10.0, &options).unwrap();

    assert_eq!(d.cells.len(), 4);
    assert_eq!(d.count_cells(), 4);
    for (i, cell) in d.cells.iter().enumerate() {
        let cell = cell.as_ref().expect("every seed should have a cell");
        assert_eq!(cell.seed(), i);
        assert!(cell.triangle_count() > 0);
        for c in cell.world_positions() {
            assert!(c.abs() <= 5.0 + 1e-9, "vertex coordinate {} outside box", c);
        }
    }
}

#[test]
fn test_explode_directions_are_unit_or_zero() {
    let bounds = BoundingBox::new([10.0, 10.0, 10.0]);
    let options = RefineOptions { iterations: 2, weld: true };
    let d = decompose(&bounds, &tetrahedral_seeds(), 10.0, &options).unwrap();

    for cell in d.cells.iter().flatten() {
        let c = cell.centroid();
        assert!(bounds.contains(&c, 1e-9));
        let dir = cell.explode_direction();
        let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
        assert!(len == 0.0 || (len - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_single_seed_fills_box() {
    let bounds = BoundingBox::new([10.0, 10.0, 10.0]);
    let options = RefineOptions { iterations: 0, weld: true };
    let d = decompose(&bounds, &[[1.0, -2.0, 0.5]], 10.0, &options).unwrap();

    assert_eq!(d.count_cells(), 1);
    let cell = d.get_cell(0).unwrap();

    // The surface is the box boundary: every vertex lies on a box face.
    for v in cell.world_positions().chunks(3) {
        assert!(v.iter().any(|c| (c.abs() - 5.0).abs() < 1e-9), "vertex {:?} is not on the boundary", v);
    }

    // Outward winding gives a positive enclosed volume equal to the box.
    let volume = cell.signed_volume();
    assert!((volume - 1000.0).abs() < 1e-6, "expected volume 1000, got {}", volume);
    // Centered on the origin, so there is no direction to explode in.
    assert_eq!(cell.explode_direction(), [0.0, 0.0, 0.0]);
}

#[test]
fn test_single_seed_in_thin_box() {
    let bounds = BoundingBox::new([12.0, 2.0, 4.0]);
    let options = RefineOptions { iterations: 3, weld: true };
    let d = decompose(&bounds, &[[0.0, 0.0, 0.0]], 6.0, &options).unwrap();

    let cell = d.get_cell(0).unwrap();
    assert!(cell.signed_volume() > 0.0);
    let h = bounds.half_extents();
    for v in cell.world_positions().chunks(3) {
        for a in 0..3 {
            assert!(v[a].abs() <= h[a] + 1e-9);
        }
    }
}

#[test]
fn test_smoothing_keeps_topology() {
    let params = Params { point_count: 8, density: 16.0, smoothing: 0, ..Params::default() };
    let rough = rebuild(&params, &Mulberry32Sampler).unwrap();
    let smooth = rebuild(&Params { smoothing: 4, ..params }, &Mulberry32Sampler).unwrap();

    assert_eq!(rough.stats, smooth.stats);
    for (a, b) in rough.cells.iter().zip(&smooth.cells) {
        match (a, b) {
            (Some(a), Some(b)) => {
                assert_eq!(a.indices(), b.indices());
                assert_ne!(a.positions(), b.positions());
            }
            (None, None) => {}
            _ => panic!("smoothing must not change which seeds have cells"),
        }
    }
}

#[test]
fn test_unwelded_output_is_flat() {
    let params = Params { point_count: 3, density: 8.0, smoothing: 0, weld: false, ..Params::default() };
    let d = rebuild(&params, &Mulberry32Sampler).unwrap();
    for cell in d.cells.iter().flatten() {
        assert!(!cell.is_indexed());
        assert_eq!(cell.vertex_count(), cell.triangle_count() * 3);
    }

    let welded = rebuild(&Params { weld: true, ..params }, &Mulberry32Sampler).unwrap();
    assert_eq!(welded.stats.triangle_count, d.stats.triangle_count);
    assert!(welded.stats.vertex_count < d.stats.vertex_count);
}

#[test]
fn test_coarse_grid_may_drop_seeds_without_error() {
    // Many seeds on a coarse grid: some regions own no lattice vertex at all.
    let params = Params { point_count: 400, density: 6.0, smoothing: 0, ..Params::default() };
    let d = rebuild(&params, &Mulberry32Sampler).unwrap();
    assert_eq!(d.cells.len(), 400);
    assert!(d.count_cells() < 400);
    assert!(d.count_cells() > 0);
    assert_eq!(d.count_cells(), d.cells.iter().filter(|c| c.is_some()).count());
}
