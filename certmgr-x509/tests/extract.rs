use certmgr_x509::{CertError, CertRecord, parse};
use rcgen::{
    BasicConstraints, CertificateParams, CrlDistributionPoint, DistinguishedName, DnType, IsCa,
    KeyPair,
};
use std::io::Write;

const GLOBALSIGN_R2: &str = include_str!("fixtures/globalsign_root_r2.pem");

fn self_signed(params: CertificateParams) -> String {
    let key = KeyPair::generate().expect("Failed to generate key");
    params.self_signed(&key).expect("Failed to self-sign").pem()
}

fn leaf_params() -> CertificateParams {
    let mut params = CertificateParams::new(vec![
        "10.0.0.1".to_string(),
        "leaf.example.test".to_string(),
        "api.example.test".to_string(),
    ])
    .expect("Failed to build params");
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Registry Test Leaf");
    params.distinguished_name = dn;
    params
}

#[test]
fn test_globalsign_root_fields() {
    let record = parse(GLOBALSIGN_R2).expect("Failed to parse GlobalSign root");

    assert_eq!(
        record.fingerprint,
        "ca42dd41745fd0b81eb902362cf9d8bf719da1bd1b1efc946f5b4c99f42c1b9e"
    );
    assert_eq!(record.fingerprint.len(), 64);
    assert_eq!(
        record.subject,
        "CN=GlobalSign,OU=GlobalSign Root CA - R2,O=GlobalSign"
    );
    assert_eq!(record.issuer, record.subject);
    assert_eq!(record.serial_number, "400000000010f8626e60d");
    assert_eq!(record.signature_algorithm, "SHA1-RSA");
    assert!(record.is_ca);

    let key_id = "9B:E2:07:57:67:1C:1E:C0:6A:06:DE:59:B4:9A:2D:DF:DC:19:86:2E";
    assert_eq!(record.subject_key_id, key_id);
    assert_eq!(record.authority_key_id, key_id);

    assert_eq!(record.crl, "http://crl.globalsign.net/root-r2.crl");
    assert_eq!(record.sans, "");
    assert_eq!(record.ocsp, "");
    assert_eq!(record.issuing_ca_url, "");

    // 2006-12-15 08:00:00 UTC .. 2021-12-15 08:00:00 UTC
    assert_eq!(record.not_before, 1_166_169_600_000);
    assert_eq!(record.not_after, 1_639_555_200_000);

    assert_eq!(record.pem, GLOBALSIGN_R2);
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse(GLOBALSIGN_R2).unwrap();
    let second = parse(GLOBALSIGN_R2).unwrap();
    assert_eq!(first, second);

    let pem = self_signed(leaf_params());
    let a = parse(&pem).unwrap();
    let b = parse(&pem).unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.subject, b.subject);
    assert_eq!(a.issuer, b.issuer);
    assert_eq!(a.sans, b.sans);
}

#[test]
fn test_leaf_sans_dns_before_ip() {
    let record = parse(&self_signed(leaf_params())).unwrap();

    assert_eq!(record.sans, "leaf.example.test|api.example.test|10.0.0.1");
    assert_eq!(
        record.san_list(),
        vec!["leaf.example.test", "api.example.test", "10.0.0.1"]
    );
    assert_eq!(record.subject, "CN=Registry Test Leaf");
    assert!(!record.is_ca);
    assert_eq!(record.crl, "");
}

#[test]
fn test_ipv6_san() {
    let params = CertificateParams::new(vec!["::1".to_string()]).unwrap();
    let record = parse(&self_signed(params)).unwrap();
    assert_eq!(record.sans, "::1");
}

#[test]
fn test_ca_with_crl_points() {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.crl_distribution_points = vec![
        CrlDistributionPoint {
            uris: vec!["http://crl.example.test/root.crl".to_string()],
        },
        CrlDistributionPoint {
            uris: vec!["http://backup.example.test/root.crl".to_string()],
        },
    ];

    let record = parse(&self_signed(params)).unwrap();
    assert!(record.is_ca);
    assert_eq!(
        record.crl,
        "http://crl.example.test/root.crl|http://backup.example.test/root.crl"
    );
    assert_eq!(record.sans, "");
}

#[test]
fn test_leading_whitespace_is_tolerated() {
    let padded = format!("\n\n  {GLOBALSIGN_R2}");
    let record = parse(&padded).unwrap();
    assert_eq!(
        record.fingerprint,
        "ca42dd41745fd0b81eb902362cf9d8bf719da1bd1b1efc946f5b4c99f42c1b9e"
    );
    assert_eq!(record.pem, padded);
}

#[test]
fn test_not_pem() {
    let err = parse("definitely not a certificate").unwrap_err();
    assert!(matches!(err, CertError::Pem(_)));
}

#[test]
fn test_wrong_block_type() {
    let key = KeyPair::generate().unwrap();
    let err = parse(&key.serialize_pem()).unwrap_err();
    assert!(matches!(err, CertError::UnexpectedBlock(ref tag) if tag == "PRIVATE KEY"));
}

#[test]
fn test_garbage_der() {
    let pem = pem::encode(&pem::Pem::new("CERTIFICATE", vec![0x30, 0x03, 0x02, 0x01]));
    let err = parse(&pem).unwrap_err();
    assert!(matches!(err, CertError::Parse(_)));
}

#[test]
fn test_from_der_matches_from_pem() {
    let block = pem::parse(GLOBALSIGN_R2).unwrap();
    let from_der = CertRecord::from_der(block.contents()).unwrap();
    let from_pem = parse(GLOBALSIGN_R2).unwrap();
    assert_eq!(from_der.fingerprint, from_pem.fingerprint);
    assert_eq!(from_der.subject_key_id, from_pem.subject_key_id);
    assert!(from_der.pem.starts_with("-----BEGIN CERTIFICATE-----"));
}

#[test]
fn test_from_pem_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(GLOBALSIGN_R2.as_bytes()).unwrap();

    let record = CertRecord::from_pem_file(file.path()).unwrap();
    assert!(record.is_ca);

    let missing = CertRecord::from_pem_file(file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(missing, CertError::Io(_)));
}

#[test]
fn test_subject_rdn_order_and_escaping() {
    let mut params = CertificateParams::new(vec!["named.example.test".to_string()]).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Named Leaf");
    dn.push(DnType::OrganizationName, "Acme, Inc.");
    dn.push(DnType::CountryName, "US");
    dn.push(DnType::OrganizationalUnitName, "#ops");
    dn.push(DnType::CustomDnType(vec![1, 2, 3, 4]), "x");
    params.distinguished_name = dn;

    let record = parse(&self_signed(params)).unwrap();
    assert_eq!(
        record.subject,
        "CN=Named Leaf,OU=\\#ops,O=Acme\\, Inc.,C=US,1.2.3.4=#130178"
    );
    assert_eq!(record.issuer, record.subject);
}

#[test]
fn test_ecdsa_signature_algorithm_name() {
    let record = parse(&self_signed(leaf_params())).unwrap();
    assert_eq!(record.signature_algorithm, "ECDSA-SHA256");
}
