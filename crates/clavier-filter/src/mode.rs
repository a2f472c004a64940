//! Filter modes of the biquad cascade.

/// Response type and slope of the filter core.
///
/// Discriminants are the host parameter indices. Each mode is one biquad
/// family run through 1–3 identical cascaded stages ([`order`](Self::order)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// 12 dB/oct lowpass
    Lp12 = 0,
    /// 24 dB/oct lowpass
    Lp24 = 1,
    /// 36 dB/oct lowpass
    Lp36 = 2,
    /// 12 dB/oct highpass
    Hp12 = 3,
    /// 24 dB/oct highpass
    Hp24 = 4,
    /// 36 dB/oct highpass
    Hp36 = 5,
    /// 6 dB/oct bandpass
    #[default]
    Bp6 = 6,
    /// 12 dB/oct bandpass
    Bp12 = 7,
    /// 18 dB/oct bandpass
    Bp18 = 8,
    /// 6 dB/oct band-reject
    Br6 = 9,
    /// 12 dB/oct band-reject
    Br12 = 10,
    /// 18 dB/oct band-reject
    Br18 = 11,
}

/// Biquad family of a [`FilterMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFamily {
    /// Lowpass
    Lowpass,
    /// Highpass
    Highpass,
    /// Bandpass
    Bandpass,
    /// Band-reject (notch)
    BandReject,
}

impl FilterMode {
    /// All modes in host index order.
    pub const ALL: [FilterMode; 12] = [
        FilterMode::Lp12,
        FilterMode::Lp24,
        FilterMode::Lp36,
        FilterMode::Hp12,
        FilterMode::Hp24,
        FilterMode::Hp36,
        FilterMode::Bp6,
        FilterMode::Bp12,
        FilterMode::Bp18,
        FilterMode::Br6,
        FilterMode::Br12,
        FilterMode::Br18,
    ];

    /// Number of modes.
    pub const COUNT: usize = Self::ALL.len();

    /// Mode for a host index, `None` when out of range.
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Decode a raw host parameter value.
    ///
    /// Rounds to nearest (ties to even) and range-checks. Non-finite values
    /// decode to `None`.
    ///
    /// ```rust
    /// use clavier_filter::FilterMode;
    ///
    /// assert_eq!(FilterMode::from_param(7.4), Some(FilterMode::Bp12));
    /// assert_eq!(FilterMode::from_param(11.6), None);
    /// assert_eq!(FilterMode::from_param(f32::NAN), None);
    /// ```
    pub fn from_param(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::from_index(libm::rintf(value) as i32)
    }

    /// Host parameter index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Host parameter value for this mode.
    #[inline]
    pub const fn as_param(self) -> f32 {
        self as u8 as f32
    }

    /// Biquad family.
    pub const fn family(self) -> FilterFamily {
        match self {
            FilterMode::Lp12 | FilterMode::Lp24 | FilterMode::Lp36 => FilterFamily::Lowpass,
            FilterMode::Hp12 | FilterMode::Hp24 | FilterMode::Hp36 => FilterFamily::Highpass,
            FilterMode::Bp6 | FilterMode::Bp12 | FilterMode::Bp18 => FilterFamily::Bandpass,
            FilterMode::Br6 | FilterMode::Br12 | FilterMode::Br18 => FilterFamily::BandReject,
        }
    }

    /// Number of cascaded stages (1–3).
    #[inline]
    pub const fn order(self) -> usize {
        self.index() % 3 + 1
    }

    /// Whether this is one of the three bandpass modes.
    #[inline]
    pub const fn is_bandpass(self) -> bool {
        matches!(self.family(), FilterFamily::Bandpass)
    }

    /// Short lowercase id used in score files and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            FilterMode::Lp12 => "lp12",
            FilterMode::Lp24 => "lp24",
            FilterMode::Lp36 => "lp36",
            FilterMode::Hp12 => "hp12",
            FilterMode::Hp24 => "hp24",
            FilterMode::Hp36 => "hp36",
            FilterMode::Bp6 => "bp6",
            FilterMode::Bp12 => "bp12",
            FilterMode::Bp18 => "bp18",
            FilterMode::Br6 => "br6",
            FilterMode::Br12 => "br12",
            FilterMode::Br18 => "br18",
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            FilterMode::Lp12 => "12dB/oct Lowpass",
            FilterMode::Lp24 => "24dB/oct Lowpass",
            FilterMode::Lp36 => "36dB/oct Lowpass",
            FilterMode::Hp12 => "12dB/oct Highpass",
            FilterMode::Hp24 => "24dB/oct Highpass",
            FilterMode::Hp36 => "36dB/oct Highpass",
            FilterMode::Bp6 => "6dB/oct Bandpass",
            FilterMode::Bp12 => "12dB/oct Bandpass",
            FilterMode::Bp18 => "18dB/oct Bandpass",
            FilterMode::Br6 => "6dB/oct Bandreject",
            FilterMode::Br12 => "12dB/oct Bandreject",
            FilterMode::Br18 => "18dB/oct Bandreject",
        }
    }

    /// Look up a mode by its [`id`](Self::id), case-insensitive.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.id().eq_ignore_ascii_case(id))
    }
}
