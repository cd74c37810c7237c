use anyhow::Result;
use clap::Parser;

use pathfinding_visualizer::algorithms::Algorithm;
use pathfinding_visualizer::compare::{comparison_table, optimal_hops, run_all_algorithms};
use pathfinding_visualizer::config::Config;
use pathfinding_visualizer::controller::{RunController, RunObserver};
use pathfinding_visualizer::layout::LayoutSetup;
use pathfinding_visualizer::visualizer::{render_grid, SilentObserver, TerminalVisualizer};

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    let setup = LayoutSetup::from_config(&config);
    let grid = setup.generate()?;
    let controller = RunController::new();

    if !config.quiet {
        println!("Starting pathfinding visualizer...");
        println!("Grid size: {}x{}", grid.width(), grid.height());
        println!("Start: {}, End: {}", grid.start(), grid.end());
        println!(
            "Walls: {}, Negative cells: {}, Layout seed: {} (for reproducibility)",
            config.num_walls, config.num_negative, setup.seed
        );
        println!("Algorithm: {}", config.algorithm);
        if config.no_visualization {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    if config.algorithm == "all" {
        let reports = run_all_algorithms(&controller, &grid, |_| Box::new(SilentObserver) as Box<dyn RunObserver>)?;
        for report in &reports {
            if !config.quiet {
                println!("Completed: {} - {}", report.algorithm, report.status);
            }
        }
        println!();
        print!("{}", comparison_table(&reports, optimal_hops(&grid)));
        return Ok(());
    }

    let algorithm: Algorithm = config.algorithm.parse()?;
    let mut grid = grid;
    let mut visualizer = TerminalVisualizer::new(&config, algorithm).with_cancel_token(controller.cancel_token());

    if let Some(report) = controller.run(&mut grid, algorithm, &mut visualizer) {
        if config.no_visualization && !config.quiet {
            print!("{}", render_grid(&grid, &report.path));
        }
        if !config.quiet {
            match optimal_hops(&grid) {
                Some(hops) => println!("Optimal hop count (A*): {}", hops),
                None => println!("No route exists from start to end - try fewer walls"),
            }
        }
    }

    Ok(())
}
