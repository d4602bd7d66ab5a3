//! Library session: alias data plus codec dispatch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::aliases::{AliasTable, CanonicalName};
use crate::codec::{Codec, HANDLERS};
use crate::error::Error;

/// MIB enum values for the Unicode charsets, resolved once at load time.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KnownMibs {
    pub(crate) ucs4: u16,
    pub(crate) ucs2: u16,
    pub(crate) utf8: u16,
    pub(crate) utf16: u16,
    pub(crate) utf16be: u16,
    pub(crate) utf16le: u16,
    pub(crate) utf32: u16,
    pub(crate) utf32be: u16,
    pub(crate) utf32le: u16,
}

/// One library "session": the encoding alias table and the codec registry.
///
/// The original design kept this state process-wide behind an
/// initialise/finalise pair; here it is an explicit value that streams,
/// filters and codecs borrow. It is read-only once constructed, so any
/// number of streams may share it.
#[derive(Debug)]
pub struct Session {
    aliases: AliasTable,
    known: KnownMibs,
}

impl Session {
    /// Loads alias data from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(|_| Error::FileNotFound)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Loads alias data from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let aliases = AliasTable::load(reader)?;
        let known = KnownMibs {
            ucs4: aliases.mibenum_from_name("UCS-4"),
            ucs2: aliases.mibenum_from_name("UCS-2"),
            utf8: aliases.mibenum_from_name("UTF-8"),
            utf16: aliases.mibenum_from_name("UTF-16"),
            utf16be: aliases.mibenum_from_name("UTF-16BE"),
            utf16le: aliases.mibenum_from_name("UTF-16LE"),
            utf32: aliases.mibenum_from_name("UTF-32"),
            utf32be: aliases.mibenum_from_name("UTF-32BE"),
            utf32le: aliases.mibenum_from_name("UTF-32LE"),
        };
        Ok(Self { aliases, known })
    }

    /// Builds a session from the alias data shipped with the crate.
    pub fn with_default_aliases() -> Self {
        // The embedded copy always parses.
        match Self::from_reader(DEFAULT_ALIASES.as_bytes()) {
            Ok(session) => session,
            Err(_) => unreachable!("embedded alias data is valid"),
        }
    }

    /// Resolves a name, canonical or alias, to its canonical record.
    pub fn canonicalise(&self, name: &str) -> Option<&CanonicalName> {
        self.aliases.canonicalise(name)
    }

    /// The MIB enum value for `name`, or 0 if unknown.
    pub fn mibenum_from_name(&self, name: &str) -> u16 {
        self.aliases.mibenum_from_name(name)
    }

    /// The canonical name registered for `mib`.
    pub fn mibenum_to_name(&self, mib: u16) -> Option<&str> {
        self.aliases.mibenum_to_name(mib)
    }

    /// Whether `mib` identifies a Unicode charset (UCS-2/4, UTF-8,
    /// UTF-16/BE/LE, UTF-32/BE/LE).
    pub fn is_unicode(&self, mib: u16) -> bool {
        let k = &self.known;
        mib != 0
            && (mib == k.ucs4
                || mib == k.ucs2
                || mib == k.utf8
                || mib == k.utf16
                || mib == k.utf16be
                || mib == k.utf16le
                || mib == k.utf32
                || mib == k.utf32be
                || mib == k.utf32le)
    }

    /// Creates a codec for `charset`.
    ///
    /// The name is canonicalised, then implementations are tried in
    /// priority order; the first that claims the canonical name is used.
    pub fn new_codec(&self, charset: &str) -> Result<Box<dyn Codec>, Error> {
        let canon = self.canonicalise(charset).ok_or(Error::BadEncoding)?;
        let unicode = self.is_unicode(canon.mib);

        for handler in HANDLERS {
            if (handler.handles)(&canon.name) {
                return (handler.create)(&canon.name, canon.mib, unicode)
                    .ok_or(Error::BadEncoding);
            }
        }

        Err(Error::BadEncoding)
    }

    pub(crate) fn known(&self) -> &KnownMibs {
        &self.known
    }
}

/// The alias records shipped with the crate.
pub(crate) const DEFAULT_ALIASES: &str = include_str!("../Aliases");
