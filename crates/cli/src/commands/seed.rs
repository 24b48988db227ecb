use crate::commands::{build_runtime, load_config, CommandFailure, CommandResult};
use corpay_db::repositories::{ApprovalFlowRepository, KvApprovalFlowRepository};
use corpay_db::{connect_from_config, migrations};

/// Applies migrations and reads the flow store once, which writes the
/// default flows when the store is empty. Existing flows are left alone.
pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_from_config(&config.storage)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let flows = KvApprovalFlowRepository::new(pool.clone())
            .load()
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        pool.close().await;
        Ok::<_, CommandFailure>(flows)
    });

    match result {
        Ok(flows) => {
            let lines: Vec<String> = flows
                .iter()
                .map(|flow| format!("  - {}: {} ({})", flow.id, flow.name, flow.status.as_str()))
                .collect();
            CommandResult::success(
                "seed",
                format!("approval flow store holds {} flows:\n{}", flows.len(), lines.join("\n")),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
