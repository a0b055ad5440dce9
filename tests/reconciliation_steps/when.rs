//! When steps for reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, run_async};
use rstest_bdd_macros::when;
use tokio_util::sync::CancellationToken;

fn reconcile(world: &mut ReconciliationWorld, dry_run: bool) {
    let reconciler = world.reconciler(dry_run);
    let result = run_async(reconciler.run(&world.repository, &CancellationToken::new()));
    world.last_summary = Some(result);
}

#[when("the tasks are reconciled")]
fn tasks_reconciled(world: &mut ReconciliationWorld) {
    reconcile(world, false);
}

#[when("the tasks are reconciled again")]
fn tasks_reconciled_again(world: &mut ReconciliationWorld) {
    reconcile(world, false);
}

#[when("the tasks are reconciled in dry-run mode")]
fn tasks_reconciled_in_dry_run(world: &mut ReconciliationWorld) {
    reconcile(world, true);
}
