use crate::data_structures::geometry::{DrawRange, Geometry};

const STAND_WOOD: [f32; 4] = [0.45, 0.28, 0.10, 1.0];
const YELLOW: [f32; 4] = [0.95, 0.75, 0.08, 1.0];

/**
 * The coffee-machine model: one shared [`Geometry`] and the range of each
 * drawable object inside it.
 *
 * Objects are built in the order stand, machine, coffee, cup, so their ranges
 * are contiguous and appear in that order in the buffers.
 */
#[derive(Clone, Debug)]
pub struct CoffeeMachine {
    pub geometry: Geometry,
    pub stand: DrawRange,
    pub machine: DrawRange,
    pub coffee: DrawRange,
    pub cup: DrawRange,
}

impl CoffeeMachine {
    pub fn build() -> Self {
        let mut geometry = Geometry::new();

        let stand = geometry.object(|g| {
            g.add_box(-0.45, 0.45, -1.4, -0.2, -0.30, 0.30, STAND_WOOD);
        });

        let machine = geometry.object(|g| {
            // body, top, side housing, control panel, emblem
            g.add_box(-0.4, 0.4, -0.2, 1.0, -0.25, 0.25, [0.12, 0.12, 0.12, 1.0]);
            g.add_box(-0.42, 0.42, 1.0, 1.08, -0.28, 0.28, [0.60, 0.60, 0.60, 1.0]);
            g.add_box(0.15, 0.38, 0.15, 0.75, -0.24, 0.24, [0.02, 0.02, 0.02, 1.0]);
            g.add_box(0.175, 0.355, 0.45, 0.62, -0.235, 0.235, [0.10, 0.40, 0.90, 1.0]);
            g.add_box(-0.1, 0.1, 0.8, 0.95, -0.255, 0.255, YELLOW);
            // front column, nozzle block, drip tray
            g.add_box(-0.18, 0.18, -0.05, 0.35, 0.25, 0.50, [0.07, 0.07, 0.07, 1.0]);
            g.add_box(-0.16, 0.16, -0.12, 0.05, 0.40, 0.45, [0.70, 0.70, 0.70, 1.0]);
            g.add_box(-0.12, 0.12, -0.14, -0.06, 0.30, 0.40, [0.20, 0.20, 0.20, 1.0]);
            for i in 0..4 {
                let y0 = 0.5 - i as f32 * 0.12;
                g.add_box(
                    -0.38,
                    -0.25,
                    y0 - 0.03,
                    y0 + 0.03,
                    -0.235,
                    -0.23,
                    [0.85, 0.85, 0.85, 1.0],
                );
            }
            g.add_box(-0.5, 0.5, -0.3, -0.2, -0.3, 0.3, YELLOW);
        });

        let coffee = geometry.object(|g| {
            g.add_box(-0.03, 0.03, -0.25, 0.10, 0.38, 0.44, [0.25, 0.12, 0.02, 1.0]);
        });

        let cup = geometry.object(|g| {
            g.add_box(-0.12, 0.12, -0.35, -0.10, 0.36, 0.46, [0.0, 0.0, 0.0, 1.0]);
            g.add_box(-0.13, 0.13, -0.10, -0.05, 0.35, 0.47, [1.0, 0.90, 0.15, 1.0]);
            g.add_box(-0.135, 0.135, -0.05, -0.03, 0.345, 0.475, [0.95, 0.95, 0.95, 1.0]);
        });

        log::debug!(
            "built coffee machine: {} vertices (stand {:?}, machine {:?}, coffee {:?}, cup {:?})",
            geometry.vertex_count(),
            stand,
            machine,
            coffee,
            cup
        );

        Self {
            geometry,
            stand,
            machine,
            coffee,
            cup,
        }
    }
}
