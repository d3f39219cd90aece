use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;

use livegrid::cli::CliArgs;
use livegrid::config::LiveGridConfig;
use livegrid::input;
use livegrid::messages::{AjaxMsg, GridMsg, Msg};
use livegrid::runtime::{App, HttpTransport, PrintObserver};

fn main() -> Result<()> {
    livegrid::tracing::init();

    let args = CliArgs::parse();
    let config = LiveGridConfig::load();
    let startup = args.into_config(&config).map_err(|e| anyhow!(e))?;

    let transport = HttpTransport::new(
        startup.base_url.as_deref(),
        Duration::from_millis(startup.http_timeout_ms),
    )?;
    let observer = PrintObserver::new(std::io::stdout(), startup.format);
    let mut app = App::new(Arc::new(transport), observer);

    for (name, url) in startup.requests {
        app.dispatch(Msg::Ajax(AjaxMsg::RegisterRequest { name, url }));
    }

    let grid_id = startup.grid_id;
    let prefetch = startup.options.prefetch_buffer;
    app.dispatch(Msg::Grid(GridMsg::Create {
        grid_id: grid_id.clone(),
        options: startup.options,
    }));
    if !prefetch {
        app.dispatch(Msg::Grid(GridMsg::RequestOffset {
            grid_id: grid_id.clone(),
            offset: 0,
        }));
    }

    input::spawn_reader(BufReader::new(std::io::stdin()), app.sender(), grid_id);
    app.run()
}
