use log::*;
use tokio::sync::broadcast;
use crate::catalog::ParameterCatalog;
use crate::error::CatalogError;
use crate::midi::MidiMessage;
use crate::midi_io::BoxedMidiOut;
use crate::model::Config;
use crate::nrpn::{self, NrpnEvent};
use crate::store::{Event, Origin};
use crate::sysex::SysexCodec;

/// Keeps the catalog, the device and the host in step.
///
/// Everything runs synchronously on the caller's thread. Callers that
/// deliver host edits and device input from different threads must wrap
/// the controller in a single lock.
pub struct SyncController {
    catalog: ParameterCatalog,
    codec: SysexCodec,
    channel: u8,
    out: Option<BoxedMidiOut>,
}

impl SyncController {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let catalog = ParameterCatalog::new(config.params.clone())?;
        let codec = SysexCodec::new(config.product);
        info!("{}: {} parameters", config.name, catalog.len());

        Ok(SyncController { catalog, codec, channel: config.channel & 0x0f, out: None })
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event<usize>> {
        self.catalog.subscribe()
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel & 0x0f;
    }

    /// Replace the output transport, returning the previous one.
    pub fn set_output(&mut self, out: Option<BoxedMidiOut>) -> Option<BoxedMidiOut> {
        match &out {
            Some(o) => info!("MIDI output: {}", o.name()),
            None => info!("MIDI output: none")
        }
        std::mem::replace(&mut self.out, out)
    }

    pub fn is_connected(&self) -> bool {
        self.out.is_some()
    }

    /// Local edit: store the value and forward it to the device. Returns
    /// the value actually stored, or `None` for a slot the catalog does
    /// not have.
    pub fn edit(&mut self, slot: usize, value: i32) -> Option<i32> {
        if slot >= self.catalog.len() {
            debug!("Ignoring edit of unknown slot {}", slot);
            return None;
        }
        let stored = self.catalog.set(slot, value);
        self.catalog.notify(Origin::UI);

        if self.out.is_none() {
            return Some(stored);
        }
        let events = nrpn::write_param(&self.catalog, slot);
        self.send_nrpn(&events);

        Some(stored)
    }

    /// Edit by parameter name. Unknown names are ignored.
    pub fn edit_by_name(&mut self, name: &str, value: i32) -> Option<i32> {
        let Some(slot) = self.catalog.find(name) else {
            warn!("Parameter {:?} not found!", name);
            return None;
        };
        self.edit(slot, value)
    }

    /// Inbound device bytes. Only complete program dumps change state;
    /// controller messages are not reassembled into parameter writes.
    pub fn on_receive(&mut self, bytes: &[u8]) {
        match MidiMessage::from_bytes(bytes) {
            Ok(MidiMessage::SysEx { data }) => {
                match self.codec.decode_message(&mut self.catalog, &data) {
                    Ok(()) => {
                        info!("Program image received");
                        self.catalog.notify_all(Origin::MIDI);
                    }
                    Err(e) => debug!("Ignoring sysex message: {}", e)
                }
            }
            Ok(msg) => trace!("Ignoring {:?}", msg),
            Err(e) => debug!("Ignoring inbound bytes {:02x?}: {}", bytes, e)
        }
    }

    /// Push the whole catalog as NRPN bursts, e.g. after connecting.
    pub fn sync_via_nrpn(&mut self) {
        if self.out.is_none() {
            return;
        }
        let events = nrpn::sync_all(&self.catalog);
        info!("Sending {} NRPN updates", events.len());
        self.send_nrpn(&events);
    }

    /// Push the whole catalog as one program image.
    pub fn sync_via_sysex(&mut self) {
        if self.out.is_none() {
            return;
        }
        let bytes = self.codec.encode_message(&self.catalog);
        self.send(&bytes);
    }

    /// Saved state: the image payload without sysex framing.
    pub fn state(&self) -> Vec<u8> {
        self.codec.encode(&self.catalog)
    }

    /// Restore saved state. Returns `false` and leaves everything untouched
    /// if `data` is not a valid payload.
    pub fn set_state(&mut self, data: &[u8]) -> bool {
        match self.codec.decode(&mut self.catalog, data) {
            Ok(()) => {
                self.catalog.notify_all(Origin::NONE);
                true
            }
            Err(e) => {
                warn!("Ignoring saved state: {}", e);
                false
            }
        }
    }

    fn send_nrpn(&mut self, events: &[NrpnEvent]) {
        for event in events {
            trace!("nrpn {} = {}", event.address, event.value);
            for msg in event.messages(self.channel) {
                self.send(&msg.to_bytes());
            }
        }
    }

    fn send(&mut self, bytes: &[u8]) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        if let Err(e) = out.send(bytes) {
            warn!("MIDI send to {} failed: {}", out.name(), e);
        }
    }
}
