// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chef_tasks::api::ChefApiClient;
use chef_tasks::commands;
use chef_tasks::commands::chef_client::ChefClientCommand;
use chef_tasks::commands::cookbook_gems::CookbookGemsCommand;
use chef_tasks::commands::cookbook_version::CookbookVersionCommand;
use chef_tasks::commands::execute::ExecuteCommand;
use chef_tasks::commands::install::InstallCommand;
use chef_tasks::commands::knife::KnifeCommand;
use chef_tasks::commands::publish_supermarket::PublishSupermarketCommand;
use chef_tasks::commands::update_environment::UpdateEnvironmentCommand;
use chef_tasks::commands::upload_cookbook::UploadCookbookCommand;
use chef_tasks::config::TaskConfig;
use chef_tasks::error::{Result, format_error_with_color};
use chef_tasks::host::{DevHost, PipelineHost, TaskHost, TaskOutcome};
use chef_tasks::install::ComponentSpec;
use chef_tasks::logging;
use chef_tasks::platform::PlatformProfile;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chef-tasks")]
#[command(author, version, about = "Pipeline tasks for Chef tooling", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read inputs from plain environment variables instead of the agent
    /// (also enabled by CHEF_TASKS_DEV=1)
    #[arg(long, global = true)]
    dev: bool,

    /// Platform to act as (dev mode only): win32 or linux
    #[arg(long, global = true, value_name = "PLATFORM")]
    platform: Option<String>,

    /// Directory the install script is written to (defaults to the binary's directory)
    #[arg(long, global = true, value_name = "DIR")]
    task_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install Chef Workstation, Chef Infra Client, InSpec or a gem
    Install,

    /// Run chef, chef-client, knife, berks, inspec or kitchen with arguments
    Execute,

    /// Pin a cookbook version in a Chef environment
    UpdateEnvironment,

    /// Set the version in a cookbook's metadata.rb
    CookbookVersion,

    /// Run knife against the configured Chef server
    Knife,

    /// Converge the node once with chef-client
    ChefClient,

    /// Share a cookbook on a Supermarket
    PublishSupermarket,

    /// Install a cookbook's dependencies and upload it with Berkshelf
    UploadCookbook,

    /// Install the gems in a cookbook's Gemfile
    CookbookGems,
}

fn default_task_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(std::env::temp_dir)
}

fn run(cli: &Cli, host: &dyn TaskHost) -> Result<TaskOutcome> {
    let config = TaskConfig::from_inputs(|name| host.input(name))?;
    commands::register_secrets(host, &config);
    let task_dir = cli.task_dir.clone().unwrap_or_else(default_task_dir);
    let profile = || PlatformProfile::resolve(&host.platform_name(), &task_dir, host.is_elevated());

    match cli.command {
        Commands::Install => {
            let profile = profile()?;
            let spec = ComponentSpec::from_config(&config.component)?;
            InstallCommand::new(host, &profile).execute(&spec)
        }
        Commands::Execute => {
            let profile = profile()?;
            ExecuteCommand::new(host, &profile).execute(&config.component)
        }
        Commands::UpdateEnvironment => {
            let client = ChefApiClient::from_config(&config.server)?;
            UpdateEnvironmentCommand::new(host, &client).execute(&config)
        }
        Commands::CookbookVersion => CookbookVersionCommand::new(host).execute(&config.cookbook),
        Commands::Knife => {
            let profile = profile()?;
            KnifeCommand::new(host, &profile).execute(&config)
        }
        Commands::ChefClient => {
            let profile = profile()?;
            ChefClientCommand::new(host, &profile).execute(&config.component)
        }
        Commands::PublishSupermarket => {
            let profile = profile()?;
            PublishSupermarketCommand::new(host, &profile).execute(&config)
        }
        Commands::UploadCookbook => {
            let profile = profile()?;
            UploadCookbookCommand::new(host, &profile).execute(&config)
        }
        Commands::CookbookGems => {
            let profile = profile()?;
            CookbookGemsCommand::new(host, &profile).execute(&config.cookbook)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let dev = cli.dev || DevHost::requested();
    let host: Box<dyn TaskHost> = if dev {
        Box::new(DevHost::from_env(cli.platform.clone()))
    } else {
        if cli.platform.is_some() {
            log::warn!("--platform is only honoured in dev mode");
        }
        Box::new(PipelineHost::from_env())
    };

    let result = run(&cli, host.as_ref());
    if dev && let Err(e) = &result {
        eprintln!(
            "{}",
            format_error_with_color(e, std::io::stderr().is_terminal())
        );
    }

    std::process::exit(commands::finish(host.as_ref(), result));
}
