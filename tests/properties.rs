use voroblock::refine::{clamp_to_box, smooth, weld, MeshBuffers, WELD_TOLERANCE};
use voroblock::{
    decompose, extract_cell, manhattan, nearest_seed, AssignmentField, BoundingBox, Grid, Mulberry32Sampler,
    RefineOptions, SeedSampler, UNASSIGNED,
};

fn random_seeds(count: usize, bounds: &BoundingBox, seed: u32) -> Vec<[f64; 3]> {
    Mulberry32Sampler.generate_seeds(count, bounds, seed)
}

#[test]
fn test_every_inside_vertex_goes_to_a_nearest_seed() {
    let bounds = BoundingBox::new([8.0, 6.0, 10.0]);
    let seeds = random_seeds(9, &bounds, 7);
    let grid = Grid::new(&bounds, 12.0).unwrap();
    let field = AssignmentField::evaluate(&seeds, &grid, &bounds);

    for z in 0..grid.vertices[2] {
        for y in 0..grid.vertices[1] {
            for x in 0..grid.vertices[0] {
                let p = grid.position(x, y, z);
                match field.seed_at(&grid, x, y, z) {
                    Some(owner) => {
                        assert!(bounds.contains(&p, 1e-6));
                        let best = seeds.iter().map(|s| manhattan(s, &p)).fold(f64::INFINITY, f64::min);
                        assert_eq!(manhattan(&seeds[owner], &p), best);
                        // No lower index is equally close.
                        assert!(seeds[..owner].iter().all(|s| manhattan(s, &p) > best));
                    }
                    None => {
                        assert!(!bounds.contains(&p, 1e-6));
                        assert_eq!(field.values()[grid.index(x, y, z)], UNASSIGNED);
                    }
                }
            }
        }
    }
}

#[test]
fn test_ties_go_to_lowest_index() {
    let seeds = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    assert_eq!(nearest_seed(&seeds, &[0.0, 0.0, 0.0]), 0);
    assert_eq!(nearest_seed(&seeds, &[-0.5, 0.5, 0.0]), 1);
    assert_eq!(nearest_seed(&seeds[1..], &[0.0, 0.0, 0.0]), 0);
}

#[test]
fn test_reordering_seeds_keeps_winning_positions() {
    let bounds = BoundingBox::new([10.0, 10.0, 10.0]);
    let seeds = random_seeds(7, &bounds, 3);
    let mut reversed = seeds.clone();
    reversed.reverse();

    let grid = Grid::new(&bounds, 14.0).unwrap();
    let a = AssignmentField::evaluate(&seeds, &grid, &bounds);
    let b = AssignmentField::evaluate(&reversed, &grid, &bounds);

    for i in 0..a.len() {
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => assert_eq!(seeds[x], reversed[y]),
            (None, None) => {}
            _ => panic!("vertex {} changed assignment state", i),
        }
    }
}

#[test]
fn test_triangle_counts_follow_seeds_under_permutation() {
    let bounds = BoundingBox::new([10.0, 10.0, 10.0]);
    let seeds = random_seeds(6, &bounds, 11);
    let mut reversed = seeds.clone();
    reversed.reverse();

    let options = RefineOptions { iterations: 0, weld: true };
    let a = decompose(&bounds, &seeds, 12.0, &options).unwrap();
    let b = decompose(&bounds, &reversed, 12.0, &options).unwrap();

    assert_eq!(a.stats.triangle_count, b.stats.triangle_count);
    let n = seeds.len();
    for i in 0..n {
        let ta = a.get_cell(i).map(|c| c.triangle_count());
        let tb = b.get_cell(n - 1 - i).map(|c| c.triangle_count());
        assert_eq!(ta, tb);
    }
}

#[test]
fn test_clamp_is_idempotent_on_real_surfaces() {
    let bounds = BoundingBox::new([6.0, 6.0, 6.0]);
    let seeds = random_seeds(3, &bounds, 5);
    let grid = Grid::new(&bounds, 8.0).unwrap();
    let field = AssignmentField::evaluate(&seeds, &grid, &bounds);

    for seed in 0..seeds.len() {
        let mut soup = extract_cell(seed, &grid, &field);
        clamp_to_box(&mut soup, &bounds);
        let once = soup.clone();
        clamp_to_box(&mut soup, &bounds);
        assert_eq!(once, soup);
        for v in soup.chunks(3) {
            assert!(bounds.contains(&[v[0], v[1], v[2]], 0.0));
        }
    }
}

#[test]
fn test_weld_is_idempotent_on_real_surfaces() {
    let bounds = BoundingBox::new([6.0, 6.0, 6.0]);
    let seeds = random_seeds(3, &bounds, 5);
    let grid = Grid::new(&bounds, 8.0).unwrap();
    let field = AssignmentField::evaluate(&seeds, &grid, &bounds);

    for seed in 0..seeds.len() {
        let soup = MeshBuffers::from_soup(extract_cell(seed, &grid, &field));
        let once = weld(&soup, WELD_TOLERANCE);
        let twice = weld(&once, WELD_TOLERANCE);
        assert_eq!(once, twice);
        assert_eq!(once.triangle_count(), soup.triangle_count());
        if soup.vertex_count() > 0 {
            assert!(once.vertex_count() < soup.vertex_count());
        }
    }
}

#[test]
fn test_zero_smoothing_only_welds() {
    let bounds = BoundingBox::new([6.0, 6.0, 6.0]);
    let seeds = random_seeds(2, &bounds, 9);
    let grid = Grid::new(&bounds, 8.0).unwrap();
    let field = AssignmentField::evaluate(&seeds, &grid, &bounds);

    let soup = MeshBuffers::from_soup(extract_cell(0, &grid, &field));
    let mut welded = weld(&soup, WELD_TOLERANCE);
    let before = welded.clone();
    smooth(&mut welded, 0);
    assert_eq!(before, welded);

    // Every soup vertex survives welding unchanged.
    for v in soup.positions.chunks(3) {
        assert!(welded.positions.chunks(3).any(|w| w == v));
    }
}

#[test]
fn test_cells_are_wound_outwards() {
    let bounds = BoundingBox::new([10.0, 8.0, 6.0]);
    let seeds = random_seeds(5, &bounds, 21);
    let d = decompose(&bounds, &seeds, 14.0, &RefineOptions { iterations: 0, weld: true }).unwrap();

    for cell in d.cells.iter().flatten() {
        assert!(cell.signed_volume() > 0.0, "cell {} is wound inwards", cell.seed());
    }
}

#[test]
fn test_smoothed_cells_stay_in_box() {
    let bounds = BoundingBox::new([10.0, 4.0, 7.0]);
    let seeds = random_seeds(6, &bounds, 2);
    let d = decompose(&bounds, &seeds, 12.0, &RefineOptions { iterations: 5, weld: true }).unwrap();

    for cell in d.cells.iter().flatten() {
        for v in cell.world_positions().chunks(3) {
            assert!(bounds.contains(&[v[0], v[1], v[2]], 1e-9));
        }
    }
}
