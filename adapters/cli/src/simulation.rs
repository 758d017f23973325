use std::time::Duration;

use sokoban_core::{Command, Event};
use sokoban_rendering::Scene;
use sokoban_system_movement::{Controls, FrameInput};
use sokoban_world::{self as world, query, World};

/// Couples the input system with the authoritative world.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    controls: Controls,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            controls: Controls::default(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Runs one frame: input becomes commands, commands become events and the
    /// events update the scene.
    pub(crate) fn advance(&mut self, now: Duration, input: FrameInput, scene: &mut Scene) {
        self.commands.clear();
        self.events.clear();

        self.controls.handle(
            &input,
            now,
            query::player(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        scene.sync(&self.world, &self.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sokoban_core::Direction;
    use sokoban_rendering::TileSize;

    #[test]
    fn frames_drive_the_world_and_the_scene() {
        let world = World::from_text(";one\n#####\n#@$.#\n#####\n;two\n#+#\n");
        let mut scene = Scene::from_world(&world, TileSize::default());
        let mut simulation = Simulation::new(world);

        simulation.advance(Duration::ZERO, FrameInput::key(Direction::East), &mut scene);

        assert_eq!(scene.to_ascii(), "#####\n# @*#\n#####");
        assert!(scene.status.as_ref().is_some_and(|status| status.solved));
    }
}
