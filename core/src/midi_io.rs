use midir::*;
use anyhow::*;
use regex::Regex;
use std::fmt;
use async_trait::async_trait;
use log::*;
use tokio::sync::mpsc;

const CLIENT_NAME: &str = "micron";

#[async_trait]
pub trait MidiIn {
    fn name(&self) -> String;
    async fn recv(&mut self) -> Option<Vec<u8>>;
    fn close(&mut self);
}

/// Outbound transport. Sends are fire-and-forget: a failed send is
/// reported but never retried.
pub trait MidiOut {
    fn name(&self) -> String;
    fn send(&mut self, bytes: &[u8]) -> Result<()>;
    fn close(&mut self);
}

pub type BoxedMidiIn = Box<dyn MidiIn + Send>;
pub type BoxedMidiOut = Box<dyn MidiOut + Send>;

pub fn box_midi_in<T: MidiIn + Send + 'static>(x: T) -> BoxedMidiIn {
    Box::new(x)
}

pub fn box_midi_out<T: MidiOut + Send + 'static>(x: T) -> BoxedMidiOut {
    Box::new(x)
}

pub struct MidiInPort {
    name: String,
    conn: Option<MidiInputConnection<()>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>
}

#[async_trait]
impl MidiIn for MidiInPort {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn recv(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            debug!("closing in {:?}", self.name);
            conn.close();
        }
        self.rx.close();
    }
}

impl Drop for MidiInPort {
    fn drop(&mut self) {
        self.close();
    }
}

pub struct MidiOutPort {
    name: String,
    conn: Option<MidiOutputConnection>,
}

impl MidiOut for MidiOutPort {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        trace!(">> {:02x?} len={}", bytes, bytes.len());
        let Some(conn) = self.conn.as_mut() else {
            bail!("Send error: connection already closed");
        };
        conn.send(bytes)
            .map_err(|e| anyhow!("Midi send error: {:?}", e))
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            debug!("closing out {:?}", self.name);
            conn.close();
        }
    }
}

impl Drop for MidiOutPort {
    fn drop(&mut self) {
        self.close()
    }
}

/// How a port is named on the command line: its index in the port list,
/// an ALSA-style `client:port` address, or the full port name.
#[derive(Debug, PartialEq)]
pub enum PortSpec<'a> {
    Index(usize),
    Address(&'a str),
    Name(&'a str),
}

impl<'a> PortSpec<'a> {
    pub fn parse(spec: &'a str) -> Result<Self> {
        let index_re = Regex::new(r"^\d+$")?;
        let address_re = Regex::new(r"^\d+:\d+$")?;

        if index_re.is_match(spec) {
            let n = spec.parse::<usize>()
                .with_context(|| format!("Unrecognized MIDI port index {:?}", spec))?;
            return Ok(PortSpec::Index(n));
        }
        if address_re.is_match(spec) {
            return Ok(PortSpec::Address(spec));
        }
        Ok(PortSpec::Name(spec))
    }

    /// Port names carry the address as a suffix, e.g. `Micron:Micron MIDI 1 24:0`.
    pub fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            PortSpec::Index(n) => *n == index,
            PortSpec::Address(addr) => name.ends_with(addr),
            PortSpec::Name(full) => name == *full,
        }
    }
}

impl fmt::Display for PortSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSpec::Index(n) => write!(f, "#{}", n),
            PortSpec::Address(addr) => write!(f, "at {:?}", addr),
            PortSpec::Name(name) => write!(f, "{:?}", name),
        }
    }
}

/// Opening a midir port of either direction.
pub trait MidiOpen: Sized {
    type Class: MidiIO;
    const DIR: &'static str;

    fn class() -> Result<Self::Class>;
    fn connect(class: Self::Class, port: <Self::Class as MidiIO>::Port) -> Result<Self>;

    /// Open the port given by index, name or `client:port` address.
    fn new_for_address(spec: &str) -> Result<Self> {
        let spec = PortSpec::parse(spec)?;
        let class = Self::class()?;

        let mut found = None;
        for (n, port) in class.ports().into_iter().enumerate() {
            if spec.matches(n, &class.port_name(&port)?) {
                found = Some(port);
                break;
            }
        }
        let Some(port) = found else {
            bail!("MIDI {} port {} not found!", Self::DIR, spec);
        };

        Self::connect(class, port)
    }
}

impl MidiOpen for MidiInPort {
    type Class = MidiInput;
    const DIR: &'static str = "input";

    fn class() -> Result<MidiInput> {
        let mut midi_in = MidiInput::new(&format!("{} midi in", CLIENT_NAME))?;
        // sysex dumps must come through
        midi_in.ignore(Ignore::None);
        Ok(midi_in)
    }

    fn connect(class: MidiInput, port: MidiInputPort) -> Result<Self> {
        let name = class.port_name(&port)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let n = name.clone();
        let conn = class.connect(&port, &format!("{} midi in conn", CLIENT_NAME), move |ts, data, _| {
            trace!("<< {:02x?} len={} ts={}", data, data.len(), ts);
            if tx.send(data.to_vec()).is_err() {
                error!("midi input ({}): receiver gone, dropping {} bytes", n, data.len());
            }
        }, ())
            .map_err(|e| anyhow!("Midi connection error: {:?}", e))?;

        info!("Opened MIDI input {:?}", name);
        Ok(MidiInPort { name, conn: Some(conn), rx })
    }
}

impl MidiOpen for MidiOutPort {
    type Class = MidiOutput;
    const DIR: &'static str = "output";

    fn class() -> Result<MidiOutput> {
        Ok(MidiOutput::new(&format!("{} midi out", CLIENT_NAME))?)
    }

    fn connect(class: MidiOutput, port: MidiOutputPort) -> Result<Self> {
        let name = class.port_name(&port)?;
        let conn = class.connect(&port, &format!("{} midi out conn", CLIENT_NAME))
            .map_err(|e| anyhow!("Midi connection error: {:?}", e))?;

        info!("Opened MIDI output {:?}", name);
        Ok(MidiOutPort { name, conn: Some(conn) })
    }
}

pub trait MidiPorts {
    fn ports() -> Result<Vec<String>>;
}

impl<T: MidiOpen> MidiPorts for T {
    /// Port names, minus the ports this process opened itself.
    fn ports() -> Result<Vec<String>> {
        let class = T::class()?;
        let own = format!("{} midi", CLIENT_NAME);
        let names = class.ports().iter()
            .map(|port| class.port_name(port))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| anyhow!("Error getting port names: {}", err))?;
        Ok(names.into_iter().filter(|name| !name.starts_with(&own)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_spec_kinds() {
        assert_eq!(PortSpec::parse("2").unwrap(), PortSpec::Index(2));
        assert_eq!(PortSpec::parse("24:0").unwrap(), PortSpec::Address("24:0"));
        assert_eq!(PortSpec::parse("Micron MIDI 1").unwrap(), PortSpec::Name("Micron MIDI 1"));
    }

    #[test]
    fn port_spec_matching() {
        let name = "Micron:Micron MIDI 1 24:0";
        assert!(PortSpec::Index(3).matches(3, name));
        assert!(!PortSpec::Index(3).matches(0, name));
        assert!(PortSpec::Address("24:0").matches(0, name));
        assert!(!PortSpec::Address("24:1").matches(0, name));
        assert!(PortSpec::Name(name).matches(7, name));
        assert!(!PortSpec::Name("Micron").matches(7, name));
    }
}
