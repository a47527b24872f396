use okcollide::prelude::*;

fn cube(center: TVec3<f32>) -> [TVec3<f32>; 8] {
    Aabb::from_min_max(center - TVec3::splat(0.5), center + TVec3::splat(0.5)).corners()
}

fn main() -> Result<(), CollisionError> {
    let mut world = CollisionWorld::new();

    world.insert("player", &cube(TVec3::zero()))?;
    world.insert("crate", &cube(TVec3::new(1.0, 0.0, 0.0)))?;
    world.insert("wall", &cube(TVec3::new(5.0, 0.0, 0.0)))?;

    assert_eq!(world.collision_loop(), 1);
    let player = world.collider("player").unwrap();
    assert_eq!(player.collided_objects().collect::<Vec<_>>(), vec!["crate"]);

    // Walk the player over to the wall.
    world.translate("player", TVec3::new(4.0, 0.0, 0.0))?;
    assert_eq!(world.collision_loop(), 1);
    assert!(world.collider("wall").unwrap().is_collided_with("player"));
    assert!(!world.collider("crate").unwrap().is_collided_with_any());

    let wall = world.remove_collider("wall")?;
    assert_eq!(wall.name(), "wall");
    assert!(!world.collider("player").unwrap().is_collided_with_any());

    Ok(())
}
