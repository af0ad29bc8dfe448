//! Key registry for archive and container decryption.
//!
//! Keys are looked up by case-insensitive file name: RSA public key PEMs by
//! archive file name (`dvdbnd0.bhd5`, `Data1.bhd`, ...), 16-byte AES keys by
//! the name of the encrypted container they open. The registry is built once
//! at startup from explicit configuration and is immutable while archives
//! are being read.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{CryptoError, Result};

/// Registry of per-file decryption keys.
#[derive(Debug, Default, Clone)]
pub struct KeyRegistry {
    /// Archive file name (lowercased) to RSA public key PEM.
    asymmetric: HashMap<String, String>,
    /// Container file name (lowercased) to AES key.
    symmetric: HashMap<String, [u8; 16]>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an RSA public key PEM for an archive file name.
    pub fn insert_asymmetric(&mut self, file_name: &str, pem: impl Into<String>) {
        self.asymmetric
            .insert(file_name.to_ascii_lowercase(), pem.into());
    }

    /// Register an AES key for a container file name.
    pub fn insert_symmetric(&mut self, file_name: &str, key: [u8; 16]) {
        self.symmetric.insert(file_name.to_ascii_lowercase(), key);
    }

    /// Look up the RSA public key PEM for an archive file name.
    pub fn asymmetric_key(&self, file_name: &str) -> Option<&str> {
        self.asymmetric
            .get(&file_name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Look up the AES key for a container file name.
    pub fn symmetric_key(&self, file_name: &str) -> Option<&[u8; 16]> {
        self.symmetric.get(&file_name.to_ascii_lowercase())
    }

    /// Number of registered keys, asymmetric and symmetric combined.
    pub fn key_count(&self) -> usize {
        self.asymmetric.len() + self.symmetric.len()
    }

    /// Load symmetric keys from a file.
    ///
    /// Lines are `filename,keyhex`, `filename\tkeyhex` or
    /// `filename keyhex [description]`; the separator is auto-detected the
    /// same way for the whole file. `#` and `//` comments and malformed
    /// lines are skipped with a warning.
    pub fn load_symmetric_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)?;

        let split: fn(&str) -> Option<(&str, &str)> = if content.contains(',') {
            |line| line.split_once(',')
        } else if content.contains('\t') {
            |line| line.split_once('\t')
        } else {
            |line| line.split_once(char::is_whitespace)
        };

        let mut loaded = 0;
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let Some((name, rest)) = split(line) else {
                warn!("Skipping invalid key line {}: {}", line_num + 1, line);
                continue;
            };
            let key_hex = rest.split_whitespace().next().unwrap_or("");

            match parse_key_hex(key_hex) {
                Ok(key) => {
                    self.insert_symmetric(name.trim(), key);
                    loaded += 1;
                }
                Err(e) => {
                    warn!("Failed to parse key on line {}: {}", line_num + 1, e);
                }
            }
        }

        info!("Loaded {} symmetric keys from {}", loaded, path.display());
        Ok(loaded)
    }

    /// Load keys from standard directories.
    ///
    /// Checks `DVDBND_KEYS_PATH` first (file or directory), then
    /// `~/.config/dvdbnd/`. In a directory, `*.pem` files register an
    /// asymmetric key under their file stem and `*.csv`/`*.tsv`/`*.txt`
    /// files are read as symmetric key lists.
    pub fn load_from_standard_dirs(&mut self) -> Result<usize> {
        let mut total = 0;

        if let Ok(path) = std::env::var("DVDBND_KEYS_PATH") {
            let path = PathBuf::from(path);
            if path.is_file() {
                total += self.load_symmetric_file(&path)?;
            } else if path.is_dir() {
                total += self.load_keys_from_dir(&path)?;
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("dvdbnd");
            if config_dir.exists() {
                total += self.load_keys_from_dir(&config_dir)?;
            }
        }

        Ok(total)
    }

    /// Load all key files from a directory.
    pub fn load_keys_from_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut total = 0;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.ends_with(".pem") {
                let stem = name.trim_end_matches(".pem");
                match fs::read_to_string(&path) {
                    Ok(pem) => {
                        self.insert_asymmetric(stem, pem);
                        total += 1;
                        debug!("Registered public key for {:?}", stem);
                    }
                    Err(e) => warn!("Failed to read {:?}: {}", path, e),
                }
            } else if name.ends_with(".csv") || name.ends_with(".tsv") || name.ends_with(".txt") {
                match self.load_symmetric_file(&path) {
                    Ok(count) => {
                        total += count;
                        debug!("Loaded {} keys from {:?}", count, path);
                    }
                    Err(e) => warn!("Failed to load keys from {:?}: {}", path, e),
                }
            }
        }

        Ok(total)
    }
}

/// Parse a 16-byte key from a hex string.
pub fn parse_key_hex(key_hex: &str) -> Result<[u8; 16]> {
    let bytes = hex::decode(key_hex.trim())
        .map_err(|e| CryptoError::InvalidKeyFile(format!("bad hex: {e}")))?;

    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::InvalidKeySize {
            expected: 16,
            actual: bytes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = KeyRegistry::new();
        registry.insert_asymmetric("Data1.bhd", "pem body");
        registry.insert_symmetric("ENC_REGULATION.BND.DCX", [7u8; 16]);

        assert_eq!(registry.asymmetric_key("data1.BHD"), Some("pem body"));
        assert_eq!(
            registry.symmetric_key("enc_regulation.bnd.dcx"),
            Some(&[7u8; 16])
        );
        assert!(registry.asymmetric_key("data2.bhd").is_none());
    }

    #[test]
    fn test_load_csv() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "# Comment line")?;
        writeln!(file, "dvdbnd0.bhd5,00112233445566778899AABBCCDDEEFF")?;
        writeln!(file, "broken line without separator hex")?;
        writeln!(file, "enc_regulation.bnd.dcx,FFEEDDCCBBAA99887766554433221100")?;

        let mut registry = KeyRegistry::new();
        let loaded = registry.load_symmetric_file(file.path())?;
        assert_eq!(loaded, 2);
        assert!(registry.symmetric_key("dvdbnd0.bhd5").is_some());

        Ok(())
    }

    #[test]
    fn test_load_txt_with_description() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "userdata.sl2 00112233445566778899AABBCCDDEEFF save container"
        )?;

        let mut registry = KeyRegistry::new();
        let loaded = registry.load_symmetric_file(file.path())?;
        assert_eq!(loaded, 1);

        Ok(())
    }

    #[test]
    fn test_parse_key_hex_wrong_size() {
        let err = parse_key_hex("0011").unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeySize {
                expected: 16,
                actual: 2
            }
        ));
    }
}
