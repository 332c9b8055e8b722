use bevy::math::primitives::Sphere;
use bevy::prelude::*;

use crate::simulation::integrator::advance;
use crate::simulation::layers::LAYERS;
use crate::simulation::scalar_field::Weather;
use crate::simulation::scenario::Scenario;

/// Component tagging each sphere with its particle index into
/// Scenario.system.particles
#[derive(Component)]
struct ParticleIndex3(pub usize);

/// Marker for the core's point light so its intensity can track the source
/// temperature.
#[derive(Component)]
struct CoreLight;

/// Base mesh radius of one particle sphere before the per-frame scale.
const PARTICLE_RADIUS: f32 = 0.8;

/// Camera placement framing all six shells.
const CAMERA_POS: Vec3 = Vec3::new(0.0, 30.0, 80.0);

/// Convenience entrypoint: insert the scenario and run the viewer.
pub fn run_3d(scenario: Scenario) {
    println!(
        "run_3d: starting viewer with {} particles",
        scenario.system.particles.len()
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (physics_step_3d, sync_particles_3d).chain())
        .run();
}

fn hex_color(c: u32) -> Color {
    Color::srgb(
        ((c >> 16) & 0xFF) as f32 / 255.0,
        ((c >> 8) & 0xFF) as f32 / 255.0,
        (c & 0xFF) as f32 / 255.0,
    )
}

/// Startup system: camera, lights, layer boundary shells, one emissive
/// sphere per particle, and the core's point light.
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.02, 0.02, 0.06)),
            ..Default::default()
        },
        transform: Transform::from_translation(CAMERA_POS).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Soft fill so the unlit side of the shells stays readable.
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.2, 0.2, 0.33),
        brightness: 80.0,
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 2000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Translucent boundary shell per layer.
    for layer in &LAYERS {
        let color = hex_color(layer.color).with_alpha(layer.opacity);
        commands.spawn(PbrBundle {
            mesh: meshes.add(Sphere::new(layer.radius as f32).mesh()),
            material: materials.add(StandardMaterial {
                base_color: color,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..Default::default()
            }),
            ..Default::default()
        });
    }

    // One sphere per particle, core included.
    for (i, p) in scenario.system.particles.iter().enumerate() {
        let base = hex_color(p.color);
        let entity = commands
            .spawn((
                PbrBundle {
                    mesh: meshes.add(Sphere::new(PARTICLE_RADIUS).mesh()),
                    material: materials.add(StandardMaterial {
                        base_color: base,
                        emissive: LinearRgba::rgb(1.0, 0.9, 0.65) * 0.3,
                        ..Default::default()
                    }),
                    transform: Transform::from_xyz(
                        p.position.x as f32,
                        p.position.y as f32,
                        p.position.z as f32,
                    )
                    .with_scale(Vec3::splat(p.render_scale())),
                    ..Default::default()
                },
                ParticleIndex3(i),
            ))
            .id();

        // The core doubles as the scene's light source.
        if p.is_core() {
            commands.entity(entity).with_children(|parent| {
                parent.spawn((
                    PointLightBundle {
                        point_light: PointLight {
                            color: hex_color(0xFFFFAA),
                            intensity: 2_000_000.0,
                            range: 200.0,
                            ..Default::default()
                        },
                        ..Default::default()
                    },
                    CoreLight,
                ));
            });
        }
    }
}

/// Per-frame simulation tick driven by wall-clock time (clamped inside
/// `advance`).
fn physics_step_3d(mut scenario: ResMut<Scenario>, time: Res<Time>) {
    let dt = time.delta_seconds() as f64;
    if dt > 0.0 {
        advance(&mut scenario, dt);
    }
}

/// Sync transforms and materials from the particle state: position, render
/// scale, and the weather-keyed emissive tint scaled by temperature.
fn sync_particles_3d(
    scenario: Res<Scenario>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&ParticleIndex3, &mut Transform, &Handle<StandardMaterial>)>,
    mut lights: Query<&mut PointLight, With<CoreLight>>,
) {
    let weather = scenario
        .aggregates
        .as_ref()
        .map(|a| a.internal_weather)
        .unwrap_or(Weather::Calm);
    let (tr, tg, tb) = weather.tint();

    for (ParticleIndex3(i), mut transform, mat_handle) in &mut query {
        if let Some(p) = scenario.system.particles.get(*i) {
            transform.translation = Vec3::new(
                p.position.x as f32,
                p.position.y as f32,
                p.position.z as f32,
            );
            transform.scale = Vec3::splat(p.render_scale());

            if let Some(mat) = materials.get_mut(mat_handle) {
                mat.emissive = LinearRgba::rgb(tr, tg, tb) * p.emissive_intensity();
            }
        }
    }

    // The core light tracks the source temperature.
    let core = scenario.system.core();
    for mut light in &mut lights {
        light.intensity = 2_000_000.0 * core.temperature as f32;
    }
}
