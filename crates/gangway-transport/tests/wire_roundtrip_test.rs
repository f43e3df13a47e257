//! Wire encode/decode round trips for the embedded transport.

use gangway_transport::{
    EmbeddedTransport, KubernetesConfig, NomadConfig, SshConfig, TransportKind, TriState,
    WireValue,
};

fn sample_transport() -> EmbeddedTransport {
    let mut ssh = SshConfig::new();
    ssh.host.set("h1".to_string());
    ssh.user = TriState::Unknown;
    ssh.private_key.set("PKEY".to_string());
    // passphrase stays null

    let mut nomad = NomadConfig::new();
    nomad.host.set("http://nomad:4646".to_string());
    nomad.allocation_id = TriState::Unknown;

    let mut transport = EmbeddedTransport::new();
    transport.set_ssh(ssh);
    transport.set_nomad(nomad);
    transport
}

#[test]
fn test_round_trip_preserves_kind_set_and_states() {
    let transport = sample_transport();
    let round = EmbeddedTransport::from_wire(&transport.to_wire()).unwrap();

    assert_eq!(
        round.configured_kinds(),
        vec![TransportKind::Ssh, TransportKind::Nomad]
    );
    assert!(!round.is_configured(TransportKind::Kubernetes));

    let ssh = round.ssh().unwrap();
    assert_eq!(ssh.host.get().unwrap(), "h1");
    assert!(ssh.user.is_unknown());
    assert!(ssh.passphrase.is_null());

    let nomad = round.nomad().unwrap();
    assert!(nomad.allocation_id.is_unknown());
    assert!(nomad.secret_id.is_null());
}

#[test]
fn test_round_trip_through_json() {
    let transport = sample_transport();
    let json = transport.to_wire().to_json();
    let round = EmbeddedTransport::from_wire(&WireValue::from_json(&json)).unwrap();
    assert_eq!(round.to_wire(), transport.to_wire());
}

#[test]
fn test_empty_transport_round_trips_to_all_null_slots() {
    let wire = EmbeddedTransport::new().to_wire();
    assert_eq!(wire.get("ssh"), Some(&WireValue::Null));
    assert_eq!(wire.get("kubernetes"), Some(&WireValue::Null));
    assert_eq!(wire.get("nomad"), Some(&WireValue::Null));

    let round = EmbeddedTransport::from_wire(&wire).unwrap();
    assert!(round.configured_kinds().is_empty());
}

#[test]
fn test_decode_replaces_rather_than_merges() {
    // Decoding a wire value with a null attribute over a transport that had
    // it set must produce null, not the stale value.
    let mut ssh = SshConfig::new();
    ssh.host.set("stale".to_string());
    let mut transport = EmbeddedTransport::new();
    transport.set_ssh(ssh);

    let incoming = WireValue::object([(
        "ssh".to_string(),
        WireValue::object([("host".to_string(), WireValue::Null)]),
    )]);
    transport = EmbeddedTransport::from_wire(&incoming).unwrap();
    assert!(transport.ssh().unwrap().host.is_null());
}

#[test]
fn test_decode_error_on_wrong_attribute_shape() {
    let wire = WireValue::object([(
        "kubernetes".to_string(),
        WireValue::object([("pod".to_string(), WireValue::Number(3.0))]),
    )]);
    let err = EmbeddedTransport::from_wire(&wire).unwrap_err();
    assert!(err.to_string().contains("kubernetes.pod"));
    assert!(err.to_string().contains("expected string, got number"));
}

#[test]
fn test_configured_kubernetes_round_trip() {
    let mut kube = KubernetesConfig::new();
    kube.kubeconfig_base64.set("a3ViZWNvbmZpZw==".to_string());
    kube.context_name.set("kind-kind".to_string());
    kube.pod.set("app-0".to_string());
    let mut transport = EmbeddedTransport::new();
    transport.set_kubernetes(kube);

    let round = EmbeddedTransport::from_wire(&transport.to_wire()).unwrap();
    assert_eq!(round.configured_kinds(), vec![TransportKind::Kubernetes]);
    assert_eq!(
        round.kubernetes().unwrap().kubeconfig_base64.get().unwrap(),
        "a3ViZWNvbmZpZw=="
    );
}
