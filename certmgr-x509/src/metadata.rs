use crate::error::{CertError, Result};
use crate::names;
use sha2::{Digest, Sha256};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{DistributionPointName, GeneralName, ParsedExtension};

/// Separator for multi-valued fields (SANs, URL lists)
pub const LIST_SEPARATOR: &str = "|";

const PEM_TAG: &str = "CERTIFICATE";
const OID_AD_OCSP: &str = "1.3.6.1.5.5.7.48.1";
const OID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Canonical descriptive fields of one certificate
///
/// Multi-valued fields are joined with [`LIST_SEPARATOR`] and are empty when
/// the certificate carries no such entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertRecord {
    /// Lowercase hex SHA-256 of the DER bytes
    pub fingerprint: String,
    /// RDNs last to first, e.g. `CN=GlobalSign,OU=GlobalSign Root CA - R2,O=GlobalSign`
    pub subject: String,
    pub issuer: String,
    /// Lowercase hex
    pub serial_number: String,
    /// e.g. `SHA256-RSA`, `ECDSA-SHA256`; dotted OID when unnamed
    pub signature_algorithm: String,
    /// `AB:CD:...` or empty
    pub authority_key_id: String,
    /// `AB:CD:...` or empty
    pub subject_key_id: String,
    /// DNS names first, then IP addresses
    pub sans: String,
    pub ocsp: String,
    pub crl: String,
    pub issuing_ca_url: String,
    pub is_ca: bool,
    /// Unix millis
    pub not_before: i64,
    /// Unix millis
    pub not_after: i64,
    pub pem: String,
}

impl CertRecord {
    /// Parse the first `CERTIFICATE` block of `pem_text`
    ///
    /// The original text is kept verbatim in [`CertRecord::pem`].
    pub fn from_pem(pem_text: &str) -> Result<Self> {
        let block = pem::parse(pem_text).map_err(|e| CertError::Pem(e.to_string()))?;
        if block.tag() != PEM_TAG {
            return Err(CertError::UnexpectedBlock(block.tag().to_string()));
        }

        let mut record = Self::from_der(block.contents())?;
        record.pem = pem_text.to_string();
        Ok(record)
    }

    /// Parse raw DER; the PEM field is re-encoded from the bytes
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let fingerprint = fingerprint_sha256(der);

        let (_, x509) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| CertError::Parse(e.to_string()))?;

        let mut record = Self {
            fingerprint,
            subject: names::distinguished_name(x509.subject()),
            issuer: names::distinguished_name(x509.issuer()),
            serial_number: x509.tbs_certificate.serial.to_str_radix(16),
            signature_algorithm: names::signature_algorithm(&x509),
            authority_key_id: String::new(),
            subject_key_id: String::new(),
            sans: String::new(),
            ocsp: String::new(),
            crl: String::new(),
            issuing_ca_url: String::new(),
            is_ca: false,
            not_before: x509.validity().not_before.timestamp() * 1000,
            not_after: x509.validity().not_after.timestamp() * 1000,
            pem: pem::encode(&pem::Pem::new(PEM_TAG, der.to_vec())),
        };
        record.apply_extensions(&x509);

        tracing::debug!(
            fingerprint = %record.fingerprint,
            subject = %record.subject,
            "Parsed certificate"
        );
        Ok(record)
    }

    /// Load a record from a PEM certificate file
    pub fn from_pem_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pem = fs::read_to_string(path)?;
        Self::from_pem(&pem)
    }

    /// SAN entries as a list
    pub fn san_list(&self) -> Vec<&str> {
        split_list(&self.sans)
    }

    fn apply_extensions(&mut self, x509: &X509Certificate<'_>) {
        let mut dns_names = Vec::new();
        let mut ip_addrs = Vec::new();
        let mut ocsp = Vec::new();
        let mut crl = Vec::new();
        let mut issuers = Vec::new();

        for ext in x509.extensions() {
            match ext.parsed_extension() {
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    if let Some(ref id) = aki.key_identifier {
                        self.authority_key_id = format_key_id(id.0);
                    }
                }
                ParsedExtension::SubjectKeyIdentifier(ski) => {
                    self.subject_key_id = format_key_id(ski.0);
                }
                ParsedExtension::SubjectAlternativeName(san) => {
                    for name in &san.general_names {
                        match name {
                            GeneralName::DNSName(dns) => dns_names.push(dns.to_string()),
                            GeneralName::IPAddress(bytes) => {
                                if let Some(ip) = ip_from_bytes(bytes) {
                                    ip_addrs.push(ip.to_string());
                                }
                            }
                            _ => {}
                        }
                    }
                }
                ParsedExtension::CRLDistributionPoints(points) => {
                    for point in &points.points {
                        if let Some(DistributionPointName::FullName(names)) =
                            &point.distribution_point
                        {
                            crl.extend(names.iter().filter_map(uri_of));
                        }
                    }
                }
                ParsedExtension::AuthorityInfoAccess(aia) => {
                    for desc in &aia.accessdescs {
                        let Some(uri) = uri_of(&desc.access_location) else {
                            continue;
                        };
                        match desc.access_method.to_id_string().as_str() {
                            OID_AD_OCSP => ocsp.push(uri),
                            OID_AD_CA_ISSUERS => issuers.push(uri),
                            _ => {}
                        }
                    }
                }
                ParsedExtension::BasicConstraints(bc) => {
                    self.is_ca = bc.ca;
                }
                _ => {}
            }
        }

        dns_names.extend(ip_addrs);
        self.sans = dns_names.join(LIST_SEPARATOR);
        self.ocsp = ocsp.join(LIST_SEPARATOR);
        self.crl = crl.join(LIST_SEPARATOR);
        self.issuing_ca_url = issuers.join(LIST_SEPARATOR);
    }
}

fn fingerprint_sha256(der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(der);
    hex::encode(hasher.finalize())
}

fn format_key_id(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            // v4-mapped addresses print in dotted form
            Some(IpAddr::V6(Ipv6Addr::from(octets)).to_canonical())
        }
        _ => None,
    }
}

fn uri_of(name: &GeneralName<'_>) -> Option<String> {
    match name {
        GeneralName::URI(uri) => Some(uri.to_string()),
        _ => None,
    }
}

fn split_list(joined: &str) -> Vec<&str> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(LIST_SEPARATOR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key_id() {
        assert_eq!(format_key_id(&[0x9b, 0xe2, 0x07]), "9B:E2:07");
        assert_eq!(format_key_id(&[]), "");
    }

    #[test]
    fn test_ip_from_bytes() {
        assert_eq!(
            ip_from_bytes(&[10, 0, 0, 1]).map(|ip| ip.to_string()),
            Some("10.0.0.1".to_string())
        );
        let mut mapped = [0u8; 16];
        mapped[10] = 0xff;
        mapped[11] = 0xff;
        mapped[12..].copy_from_slice(&[192, 168, 1, 7]);
        assert_eq!(
            ip_from_bytes(&mapped).map(|ip| ip.to_string()),
            Some("192.168.1.7".to_string())
        );
        let mut loopback = [0u8; 16];
        loopback[15] = 1;
        assert_eq!(
            ip_from_bytes(&loopback).map(|ip| ip.to_string()),
            Some("::1".to_string())
        );
        assert!(ip_from_bytes(&[1, 2, 3]).is_none());
    }

    #[test]
    fn test_split_list() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a.test|10.0.0.1"), vec!["a.test", "10.0.0.1"]);
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex() {
        let fp = fingerprint_sha256(b"abc");
        assert_eq!(
            fp,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
