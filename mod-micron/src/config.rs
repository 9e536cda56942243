use maplit::*;
use once_cell::sync::Lazy;
use micron_core::builders::shorthand::*;
use micron_core::model::*;

macro_rules! fmt {
    ($k:expr, $b:expr, $f:expr) => ( Format::Data(FormatData { k: $k, b: $b, format: ($f).into() }) );
    ($f:expr) => ( fmt!(1.0, 0.0, $f) );
}

/// Per-effect addresses of a slot parameter: effect `n` uses `base + n`
/// when it is listed in `live`.
fn fx(base: u16, live: &[usize], effects: usize) -> Vec<Option<u16>> {
    (0 .. effects)
        .map(|n| live.contains(&n).then_some(base + n as u16))
        .collect()
}

const FX1_TYPES: &[&str] = &[
    "bypass", "super phaser", "string phaser", "theta flanger",
    "thru-zero flanger", "chorus", "vocoder"
];
const FX2_TYPES: &[&str] = &[
    "bypass", "mono delay", "stereo delay", "split L/R delay",
    "hall reverb", "plate reverb", "room reverb"
];

const FX1_MODULATION: &[usize] = &[1, 2, 3, 4, 5];
const FX1_ALL: &[usize] = &[1, 2, 3, 4, 5, 6];
const FX2_DELAYS: &[usize] = &[1, 2, 3];
const FX2_REVERBS: &[usize] = &[4, 5, 6];
const FX2_ALL: &[usize] = &[1, 2, 3, 4, 5, 6];

const WAVEFORMS: &[&str] = &["sine", "triangle/saw", "square/pulse"];
const FILTER_TYPES: &[&str] = &[
    "bypass", "2-pole lowpass", "2-pole bandpass", "2-pole highpass",
    "4-pole lowpass", "4-pole highpass", "comb", "vocal formant"
];

fn osc(n: u16) -> Vec<ParameterDefinition> {
    let base = 8 + (n - 1) * 5;
    convert_args!(vec!(
        param(&format!("osc{}_waveform", n)).values(WAVEFORMS).nrpn(base),
        bipolar(&format!("osc{}_shape", n), 100).nrpn(base + 1),
        bipolar(&format!("osc{}_octave", n), 3).nrpn(base + 2),
        bipolar(&format!("osc{}_semitone", n), 7).nrpn(base + 3),
        bipolar(&format!("osc{}_detune", n), 99).nrpn(base + 4)
            .format(fmt!("{val} cents")),
    ))
}

fn filter(n: u16) -> Vec<ParameterDefinition> {
    let base = 40 + (n - 1) * 5;
    convert_args!(vec!(
        param(&format!("filter{}_type", n)).values(FILTER_TYPES).nrpn(base),
        param(&format!("filter{}_cutoff", n)).range(0, 1023).default(1023).nrpn(base + 1),
        percent(&format!("filter{}_resonance", n)).nrpn(base + 2),
        bipolar(&format!("filter{}_keytrack", n), 100).nrpn(base + 3),
        bipolar(&format!("filter{}_env_amount", n), 100).nrpn(base + 4),
    ))
}

fn env(n: u16) -> Vec<ParameterDefinition> {
    let base = 60 + (n - 1) * 5;
    convert_args!(vec!(
        param(&format!("env{}_attack", n)).range(0, 255).nrpn(base),
        param(&format!("env{}_decay", n)).range(0, 255).default(64).nrpn(base + 1),
        percent(&format!("env{}_sustain", n)).default(100).nrpn(base + 2),
        param(&format!("env{}_release", n)).range(0, 255).default(32).nrpn(base + 3),
        percent(&format!("env{}_velocity", n)).nrpn(base + 4),
    ))
}

pub static MICRON_CONFIG: Lazy<Config> = Lazy::new(|| {
    let voice: Vec<ParameterDefinition> = convert_args!(vec!(
        param("polyphony").values(&["mono", "poly"]).default(1).nrpn(0),
        switch("unison").nrpn(1),
        percent("unison_detune").nrpn(2),
        switch("portamento").nrpn(3),
        param("portamento_type").values(&["fixed rate", "fixed time"]).nrpn(4),
        param("portamento_time").range(0, 127).nrpn(5),
        param("pitch_wheel_range").range(0, 12).default(2).nrpn(6)
            .format(fmt!("{val} semitones")),
        percent("analog_drift").nrpn(7),
    ));

    let mixer: Vec<ParameterDefinition> = convert_args!(vec!(
        switch("osc_sync").nrpn(23),
        percent("fm_amount").nrpn(24),
        percent("osc1_level").default(100).nrpn(25),
        percent("osc2_level").nrpn(26),
        percent("osc3_level").nrpn(27),
        percent("ring_level").nrpn(28),
        percent("noise_level").nrpn(29),
        percent("ext_level").nrpn(30),
        bipolar("filter_balance", 50).nrpn(31),
        switch("filter_link").nrpn(50),
        percent("pre_filter_drive").nrpn(51),
        percent("program_level").default(80).nrpn(52),
        bipolar("pan", 64).nrpn(53),
    ));

    let modulation: Vec<ParameterDefinition> = convert_args!(vec!(
        param("lfo1_rate").range(0, 1000).default(200).nrpn(80)
            .format(fmt!(0.01, 0.0, "{val:1.2f} Hz")),
        param("lfo1_tempo_sync").value_nrpn("off", 0)
            .value_nrpn("4 bars", 1001).value_nrpn("2 bars", 1002)
            .value_nrpn("1 bar", 1004).value_nrpn("1/2", 1008)
            .value_nrpn("1/4", 1016).value_nrpn("1/8", 1032)
            .value_nrpn("1/16", 1064).nrpn(81),
        param("lfo2_rate").range(0, 1000).default(100).nrpn(82)
            .format(fmt!(0.01, 0.0, "{val:1.2f} Hz")),
        param("sample_hold_rate").range(0, 1000).default(500).nrpn(83),
        percent("sample_hold_smoothing").nrpn(84),
    ));

    let effects: Vec<ParameterDefinition> = convert_args!(vec!(
        param("fx1_type").values(FX1_TYPES).nrpn(600).selector(700 ..= 749),
        percent("fx1_mix").default(50).nrpn(700)
            .slot_of("fx1_type", &fx(700, FX1_ALL, FX1_TYPES.len())),
        param("fx1_rate").range(0, 127).default(20).nrpn(710)
            .slot_of("fx1_type", &fx(710, FX1_MODULATION, FX1_TYPES.len())),
        percent("fx1_depth").default(50).nrpn(720)
            .slot_of("fx1_type", &fx(720, FX1_MODULATION, FX1_TYPES.len())),
        bipolar("fx1_feedback", 100).nrpn(730)
            .slot_of("fx1_type", &fx(730, &[1, 3, 4], FX1_TYPES.len())),
        percent("fx1_sibilance").nrpn(740)
            .slot_of("fx1_type", &fx(740, &[6], FX1_TYPES.len())),

        param("fx2_type").values(FX2_TYPES).nrpn(601).selector(800 ..= 849),
        percent("fx2_mix").default(25).nrpn(800)
            .slot_of("fx2_type", &fx(800, FX2_ALL, FX2_TYPES.len())),
        param("fx2_time").range(0, 2600).default(375).nrpn(810)
            .format(fmt!("{val} ms"))
            .slot_of("fx2_type", &fx(810, FX2_DELAYS, FX2_TYPES.len())),
        percent("fx2_feedback").default(30).nrpn(820)
            .slot_of("fx2_type", &fx(820, FX2_DELAYS, FX2_TYPES.len())),
        percent("fx2_decay").default(40).nrpn(830)
            .slot_of("fx2_type", &fx(830, FX2_REVERBS, FX2_TYPES.len())),
        percent("fx2_damping").default(50).nrpn(840)
            .slot_of("fx2_type", &fx(840, FX2_REVERBS, FX2_TYPES.len())),

        bipolar("fx_balance", 50).nrpn(602),
    ));

    // the tracking generator has no NRPNs, it only travels in program dumps
    let tracking: Vec<ParameterDefinition> = convert_args!(vec!(
        param("tracking_input").values(&["pitch", "velocity", "lfo1", "lfo2", "mod wheel"]).nrpn(2048),
        param("tracking_points").values(&["12", "16"]).nrpn(2049),
        param("tracking_preset").values(&["custom", "bypass", "negate", "abs", "invert", "quantize"])
            .default(1).nrpn(2050),
    ));

    let program: Vec<ParameterDefinition> = convert_args!(vec!(
        param("category").values(&[
            "recent", "faves", "bass", "lead", "pad", "string", "brass",
            "key", "comp", "drum", "sfx"
        ]),
    ));

    let params = [
        voice,
        osc(1), osc(2), osc(3),
        mixer,
        filter(1), filter(2),
        env(1), env(2), env(3),
        modulation,
        effects,
        tracking,
        program,
    ].concat();

    Config {
        name: "Alesis Micron/Ion".to_string(),
        product: 0x22,
        channel: 0,
        params
    }
});
