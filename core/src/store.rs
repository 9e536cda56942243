use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    None,
    Change,
    Force
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    NONE,
    MIDI,
    UI
}

#[derive(Clone, Debug, PartialEq)]
pub struct Event<K: Clone> {
    pub key: K,
    pub origin: Origin,
    pub signal: Signal
}

pub struct StoreBase<K: Clone> {
    tx: broadcast::Sender<Event<K>>
}

impl <K: Clone> StoreBase<K> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Event<K>>(capacity.max(16));
        StoreBase { tx }
    }

    /// Returns `true` if an event was emitted.
    pub fn send_signal(&self, key: K, value_changed: bool, origin: Origin, signal: Signal) -> bool {
        let send = match signal {
            Signal::Force => true,
            Signal::Change if value_changed => true,
            _ => false
        };
        if send {
            let event = Event { key, origin, signal };
            // no subscribers is fine
            self.tx.send(event).ok();
        }
        send
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event<K>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_signal_suppresses_duplicates() {
        let store = StoreBase::<usize>::new(16);
        let mut rx = store.subscribe();

        assert!(!store.send_signal(1, false, Origin::UI, Signal::Change));
        assert!(store.send_signal(2, true, Origin::UI, Signal::Change));
        assert!(store.send_signal(3, false, Origin::MIDI, Signal::Force));
        assert!(!store.send_signal(4, true, Origin::MIDI, Signal::None));

        assert_eq!(rx.try_recv().unwrap(), Event { key: 2, origin: Origin::UI, signal: Signal::Change });
        assert_eq!(rx.try_recv().unwrap(), Event { key: 3, origin: Origin::MIDI, signal: Signal::Force });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sending_without_subscribers_is_harmless() {
        let store = StoreBase::<usize>::new(1);
        assert!(store.send_signal(0, true, Origin::NONE, Signal::Force));
    }
}
