use clap::Args;
use rust_decimal::Decimal;
use serde_json::json;

use crate::commands::{
    application_failure, build_runtime, load_config, new_correlation_id, CommandFailure,
    CommandResult,
};
use corpay_core::console::ConsoleSession;
use corpay_core::domain::approval::FlowId;
use corpay_core::domain::scenario::{RequesterRole, Scenario};
use corpay_db::repositories::KvApprovalFlowRepository;
use corpay_db::{connect_from_config, migrations, ApprovalFlowService};

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[arg(long, help = "Approval flow id, e.g. AF-PURCHASES")]
    pub flow: String,
    #[arg(long, allow_hyphen_values = true, help = "Transaction amount in UGX")]
    pub amount: String,
    #[arg(long, help = "Requester role: Viewer, Member, Approver, Finance, Admin or Owner")]
    pub role: String,
    #[arg(long = "type", default_value = "Purchases", help = "Transaction type")]
    pub transaction_type: String,
    #[arg(long, default_value = "", help = "Vendor name (informational)")]
    pub vendor: String,
    #[arg(long, default_value = "", help = "Originating module (informational)")]
    pub module: String,
}

impl SimulateArgs {
    fn scenario(&self) -> Result<Scenario, CommandFailure> {
        let amount = self.amount.trim().parse::<Decimal>().map_err(|error| {
            ("input_validation", format!("invalid amount `{}`: {error}", self.amount), 6u8)
        })?;
        let role = self
            .role
            .parse::<RequesterRole>()
            .map_err(|error| ("input_validation", error.to_string(), 6u8))?;

        Ok(Scenario::new(self.transaction_type.clone(), amount, role)
            .with_vendor(self.vendor.clone())
            .with_module(self.module.clone()))
    }
}

pub fn run(args: SimulateArgs) -> CommandResult {
    let scenario = match args.scenario() {
        Ok(scenario) => scenario,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("simulate", error_class, message, exit_code);
        }
    };
    let config = match load_config("simulate") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("simulate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let flow_id = FlowId(args.flow.trim().to_string());
    let correlation_id = new_correlation_id();

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
        let outcome = service
            .simulate(&flow_id, &scenario, &correlation_id)
            .await
            .map_err(application_failure);

        pool.close().await;
        Ok::<_, CommandFailure>(outcome?)
    });

    let simulation = match result {
        Ok(simulation) => simulation,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("simulate", error_class, message, exit_code);
        }
    };

    let mut session = ConsoleSession::new(config.console.org.clone());
    session.select_flow(flow_id.clone());
    session.record_simulation(scenario.clone(), simulation.clone());
    let message = session
        .latest_toast()
        .map(|toast| format!("{}: {}", toast.title, toast.message))
        .unwrap_or_else(|| simulation.decision.to_string());

    CommandResult::success_with_data(
        "simulate",
        message,
        json!({
            "org": session.org,
            "flowId": flow_id,
            "correlationId": correlation_id,
            "scenario": scenario,
            "result": simulation,
            "toast": session.latest_toast(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::SimulateArgs;
    use corpay_core::domain::scenario::RequesterRole;

    fn args(amount: &str, role: &str) -> SimulateArgs {
        SimulateArgs {
            flow: "AF-PURCHASES".to_string(),
            amount: amount.to_string(),
            role: role.to_string(),
            transaction_type: "Purchases".to_string(),
            vendor: "Kampala Office Supplies".to_string(),
            module: String::new(),
        }
    }

    #[test]
    fn scenario_is_built_from_arguments() {
        let scenario = args(" 540000 ", "approver").scenario().expect("scenario");

        assert_eq!(scenario.amount_ugx, Decimal::new(540_000, 0));
        assert_eq!(scenario.requester_role, RequesterRole::Approver);
        assert_eq!(scenario.vendor, "Kampala Office Supplies");
    }

    #[test]
    fn unparseable_amount_is_an_input_error() {
        let error = args("lots", "Member").scenario().expect_err("bad amount");

        assert_eq!(error.0, "input_validation");
        assert_eq!(error.2, 6);
    }

    #[test]
    fn unknown_role_is_an_input_error() {
        let error = args("1000", "Auditor").scenario().expect_err("bad role");

        assert_eq!(error.0, "input_validation");
        assert!(error.1.contains("auditor"));
    }
}
