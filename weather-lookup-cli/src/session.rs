//! Interactive session: every line typed becomes the query and starts a
//! search. Fetches run as tasks so typing stays responsive; outcomes come
//! back over a channel and stale ones are dropped by the widget. `:q` quits
//! at once; end of input waits for the search still in flight.

use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;
use weather_lookup_core::{
    SearchPhase, SearchTicket, WeatherError, WeatherProvider, WeatherResult, WeatherWidget, render,
};

type Outcome = (SearchTicket, Result<WeatherResult, WeatherError>);

pub async fn run(provider: Arc<dyn WeatherProvider>, icon_base_url: String) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut out = io::stdout();
    drive(provider, &icon_base_url, input, &mut out).await
}

async fn drive<R, W>(
    provider: Arc<dyn WeatherProvider>,
    icon_base_url: &str,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut widget = WeatherWidget::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    // Dropped at end of input, so `recv` yields `None` once every fetch task
    // has finished or died.
    let mut tx = Some(tx);
    let mut lines = input.lines();

    redraw(&widget, icon_base_url, out)?;

    loop {
        if tx.is_none() && widget.phase() != SearchPhase::Fetching {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if tx.is_some() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    tx = None;
                    continue;
                };
                if is_quit(&line) {
                    break;
                }

                widget.set_query(line);
                if let (Some(ticket), Some(sender)) = (widget.begin_search(), tx.as_ref()) {
                    spawn_fetch(Arc::clone(&provider), ticket, sender.clone());
                }
                redraw(&widget, icon_base_url, out)?;
            }
            received = rx.recv() => {
                let Some((ticket, outcome)) = received else {
                    debug!("no fetch left to report; ending session");
                    break;
                };
                if widget.complete(&ticket, outcome) {
                    redraw(&widget, icon_base_url, out)?;
                }
            }
        }
    }

    debug!("interactive session ended");
    Ok(())
}

fn spawn_fetch(
    provider: Arc<dyn WeatherProvider>,
    ticket: SearchTicket,
    tx: mpsc::UnboundedSender<Outcome>,
) {
    tokio::spawn(async move {
        let outcome = provider.current_weather(ticket.city()).await;
        // Receiver is gone once the session ends; nothing left to update.
        let _ = tx.send((ticket, outcome));
    });
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), ":q" | ":quit")
}

fn redraw<W: Write>(widget: &WeatherWidget, icon_base_url: &str, out: &mut W) -> anyhow::Result<()> {
    let view = render(widget, icon_base_url);
    writeln!(out, "{view}").context("Failed to write to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}
