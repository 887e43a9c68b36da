//! End-to-end: run an engine to completion, hand its output to the
//! renderer, and check the resulting image.

use motiv_core::{ChaosGame, NewtonBasinSolver, NewtonParams, Point, Triangle};
use motiv_render::{
    colorize_basins, colorize_convergence, rasterize_scatter, BasinPalette,
};

fn sierpinski_triangle() -> Triangle {
    Triangle::new(
        Point::new(1.0, 1.0).unwrap(),
        Point::new(2.0, 3.0f64.sqrt()).unwrap(),
        Point::new(3.0, 1.0).unwrap(),
    )
}

#[test]
fn chaos_game_to_scatter_image() {
    let triangle = sierpinski_triangle();
    let mut game = ChaosGame::seeded(triangle, 7);
    let points = game.run(20_000).unwrap();

    let image = rasterize_scatter(points, triangle.bounding_box(), 128).unwrap();
    assert_eq!(image.width, 128);
    assert_eq!(image.height, 128);

    // The attractor covers a real fraction of the frame, but nowhere near
    // all of it — the central hole alone removes a quarter.
    let dark = image
        .pixels
        .chunks_exact(4)
        .filter(|px| px[0] < 255)
        .count();
    let total = 128 * 128;
    assert!(dark > total / 20, "attractor too sparse: {dark}");
    assert!(dark < total * 3 / 4, "attractor too dense: {dark}");
}

#[test]
fn newton_run_to_basin_and_convergence_images() {
    let params = NewtonParams::new(4, (-2.0, 2.0), (-2.0, 2.0), 64, 50, 1e-6).unwrap();
    let mut solver = NewtonBasinSolver::new(params).unwrap();
    solver.compute();

    let palette = BasinPalette::spectrum(4);
    let basins = colorize_basins(solver.basin().unwrap(), &palette).unwrap();
    let rate = colorize_convergence(solver.iteration_counts().unwrap()).unwrap();

    assert_eq!(basins.width, 64);
    assert_eq!(basins.height, 64);
    assert_eq!(basins.pixels.len(), rate.pixels.len());

    // All four basin colors appear somewhere in the image.
    for label in 1..=4 {
        let [r, g, b] = palette.color(label);
        let found = basins
            .pixels
            .chunks_exact(4)
            .any(|px| px[0] == r && px[1] == g && px[2] == b);
        assert!(found, "basin color {label} missing from image");
    }
}

#[test]
fn deterministic_pipeline_produces_identical_images() {
    let triangle = sierpinski_triangle();

    let mut a = ChaosGame::seeded(triangle, 99);
    let mut b = ChaosGame::seeded(triangle, 99);
    let image_a = rasterize_scatter(a.run(5_000).unwrap(), triangle.bounding_box(), 64).unwrap();
    let image_b = rasterize_scatter(b.run(5_000).unwrap(), triangle.bounding_box(), 64).unwrap();

    assert_eq!(image_a.pixels, image_b.pixels);
}
