mod opts;

use std::time::Duration;
use anyhow::*;
use core::result::Result::Ok;
use log::*;
use tokio::time::timeout;
use micron_core::host::HostParameters;
use micron_core::midi_io::*;
use micron_core::store::Signal;
use micron_core::SyncController;

use crate::opts::*;

fn open_output(opts: &Opts) -> Result<BoxedMidiOut> {
    let port = opts.output.as_ref()
        .context("MIDI output port not specified")?;
    Ok(box_midi_out(MidiOutPort::new_for_address(port)?))
}

fn open_input(opts: &Opts) -> Result<BoxedMidiIn> {
    let port = opts.input.as_ref()
        .context("MIDI input port not specified")?;
    Ok(box_midi_in(MidiInPort::new_for_address(port)?))
}

fn list_ports() -> Result<()> {
    println!("Input ports:");
    for (i, name) in MidiInPort::ports()?.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    println!("Output ports:");
    for (i, name) in MidiOutPort::ports()?.iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    Ok(())
}

fn print_program(sync: &SyncController) {
    let host = HostParameters::new(sync.catalog());
    for index in 0 .. host.count() {
        let name = host.name(sync, index).unwrap_or_default();
        let text = host.text(sync, index).unwrap_or_default();
        let shadowed = host.slot(index)
            .map(|slot| sync.catalog().is_shadowed(slot))
            .unwrap_or_default();
        if shadowed {
            continue;
        }
        println!("{:>24}: {}", name, text);
    }
}

async fn wait_for_program(sync: &mut SyncController, midi_in: &mut BoxedMidiIn,
                          wait: Duration) -> Result<()> {
    let mut events = sync.subscribe();
    let port = midi_in.name();
    info!("Waiting for a program dump on {:?}", port);

    let receive = async {
        while let Some(bytes) = midi_in.recv().await {
            sync.on_receive(&bytes);
            // a decoded image is announced with a forced event per slot
            let mut received = false;
            while let Ok(event) = events.try_recv() {
                received |= event.signal == Signal::Force;
            }
            if received {
                return true;
            }
        }
        false
    };

    match timeout(wait, receive).await {
        Ok(true) => Ok(()),
        Ok(false) => bail!("MIDI input {:?} closed", port),
        Err(_) => bail!("No program dump received in {}s", wait.as_secs())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;

    let opts: Opts = Opts::parse();
    let config = micron_mod_micron::config();
    let mut sync = SyncController::new(config)
        .with_context(|| format!("Invalid {} configuration", config.name))?;
    sync.set_channel(opts.channel - 1);

    match &opts.command {
        Command::Ports => list_ports()?,
        Command::Dump { timeout, save } => {
            let mut midi_in = open_input(&opts)?;
            wait_for_program(&mut sync, &mut midi_in, Duration::from_secs(*timeout)).await?;
            print_program(&sync);
            if let Some(path) = save {
                std::fs::write(path, sync.state())
                    .with_context(|| format!("Failed to write {:?}", path))?;
                info!("Program saved to {:?}", path);
            }
        }
        Command::Send { file, nrpn } => {
            let data = std::fs::read(file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            if !sync.set_state(&data) {
                bail!("{:?} is not a valid program state", file);
            }
            sync.set_output(Some(open_output(&opts)?));
            if *nrpn {
                sync.sync_via_nrpn();
            } else {
                sync.sync_via_sysex();
            }
        }
        Command::Set { name, value } => {
            sync.set_output(Some(open_output(&opts)?));
            let Some(stored) = sync.edit_by_name(name, *value) else {
                bail!("Unknown parameter {:?}", name);
            };
            if stored != *value {
                warn!("{} clamped to {}", name, stored);
            }
        }
    }

    if let Some(mut out) = sync.set_output(None) {
        out.close();
    }
    Ok(())
}
