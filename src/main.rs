use bevy::prelude::*;
use bevy::window::WindowResolution;

use singularity::rendering::RenderPlugin;
use singularity::simulation::SimulationPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Singularity".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(SimulationPlugin)
        .add_plugins(RenderPlugin)
        .run();
}
