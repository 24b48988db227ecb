use serde_json::json;

use crate::commands::{
    application_failure, build_runtime, load_config, CommandFailure, CommandResult,
};
use corpay_db::repositories::KvApprovalFlowRepository;
use corpay_db::{connect_from_config, migrations, ApprovalFlowService};

pub fn run() -> CommandResult {
    let config = match load_config("flows") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("flows") {
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

        let service = ApprovalFlowService::new(
            KvApprovalFlowRepository::new(pool.clone()),
            config.console.actor.clone(),
        );
        let flows = service.list_flows().await.map_err(application_failure);

        pool.close().await;
        Ok::<_, CommandFailure>(flows?)
    });

    match result {
        Ok(flows) => {
            let message = format!("{} approval flows", flows.len());
            CommandResult::success_with_data(
                "flows",
                message,
                json!({ "org": config.console.org, "flows": flows }),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("flows", error_class, message, exit_code)
        }
    }
}
