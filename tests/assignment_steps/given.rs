//! Given steps for task assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_day, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::task::{domain::Actor, services::TaskInput};

#[given(r#"a member named "{name}""#)]
fn member_named(world: &mut AssignmentWorld, name: String) {
    world.add_member(&name);
}

#[given(r#""{name}" already holds "{title}" from "{start}" to "{end}""#)]
fn member_holds_task(
    world: &mut AssignmentWorld,
    name: String,
    title: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let user_id = world.member(&name)?.id();
    let input = TaskInput::new(
        title,
        parse_day(&start)?,
        parse_day(&end)?,
        user_id,
        world.stack.status("To Do").id(),
    );
    let admin = Actor::admin(world.stack.admin.id());
    let task = run_async(world.stack.service.create(&admin, input))
        .wrap_err("create existing task")?;
    world.last_task = Some(task);
    Ok(())
}
