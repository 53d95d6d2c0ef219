//! # Registry Scenarios
//!
//! Drives `RegistryService` end to end: frames go in as bag-of-cells bytes,
//! child records come out on the ledger.
//!
//! ## Flows Tested:
//!
//! 1. **Deploy**: verifier source → registry → ledger → child record
//! 2. **Reconfiguration**: admin handover, verifier handover, fee bounds, code
//! 3. **Child guard**: duplicate and foreign set-content deliveries
//! 4. **Ledger failure**: registry outcome does not depend on the ledger

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use source_registry::prelude::*;
    use std::sync::Arc;

    const HASH: &str = "E5ny0LU1Q9ESmmVUNa8uFOyuN3JDbvHgsURxUtdETnI=";
    const URL: &str = "https://x/y.json";

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn coins(text: &str) -> Coins {
        text.parse().unwrap()
    }

    fn deploy_body(identity: &str, url: &str) -> Vec<u8> {
        RegistryMessage::deploy_source(0, identity, HASH, url.as_bytes())
            .unwrap()
            .to_boc()
            .unwrap()
    }

    fn admin_body(operation: RegistryOperation) -> Vec<u8> {
        RegistryMessage::new(0, operation).to_boc().unwrap()
    }

    fn code(bytes: &[u8]) -> ArcCell {
        let mut b = shared_cells::CellBuilder::new();
        b.store_bytes(bytes).unwrap();
        Arc::new(b.build().unwrap())
    }

    fn registry_on<L: LedgerAccess>(ledger: Arc<L>, code_tag: &[u8]) -> RegistryService<L> {
        let state = RegistryState {
            admin: TEST_ADMIN,
            verifier_source: TEST_VERIFIER_SOURCE,
            min_fee: coins("0.065"),
            max_fee: coins("1"),
            child_code: code(b"source-item"),
        };
        RegistryService::new(ledger, ServiceConfig::default(), code(code_tag), state).unwrap()
    }

    /// Ledger that is never reachable.
    struct UnreachableLedger;

    #[async_trait]
    impl LedgerAccess for UnreachableLedger {
        async fn deploy_child(
            &self,
            _action: DeployAction,
            _from: MsgAddress,
        ) -> Result<ChildDelivery, LedgerError> {
            Err(LedgerError::Unavailable)
        }

        async fn child_data(&self, _address: MsgAddress) -> Result<SourceItemData, LedgerError> {
            Err(LedgerError::Unavailable)
        }
    }

    // =============================================================================
    // DEPLOY FLOW
    // =============================================================================

    #[tokio::test]
    async fn test_deploy_scenario() {
        init_tracing();
        let service = create_test_service().unwrap();
        let body = deploy_body("my verifier", URL);

        let receipt = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &body)
            .await;
        assert_eq!(receipt.exit_code, 0);

        let first = service.child_address_for("my verifier", HASH).await.unwrap();
        let second = service.child_address_for("my verifier", HASH).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(receipt.deployed_address, Some(first));

        let item = service.source_item(first).await.unwrap();
        assert_eq!(item.content_pointer_str(), Some(URL));
        assert_eq!(item.verifier_key, derive_verifier_key("my verifier"));
        assert_eq!(item.content_key, decode_content_key(HASH).unwrap());

        let stranger = MsgAddress::new(0, [0x99; 32]);
        let rejected = [
            (stranger, "0.5", 401),
            (TEST_VERIFIER_SOURCE, "0.049", 900),
            (TEST_VERIFIER_SOURCE, "1.01", 901),
        ];
        for (sender, value, expected) in rejected {
            let receipt = service.handle_message(sender, coins(value), &body).await;
            assert_eq!(receipt.exit_code, expected, "sender {sender} value {value}");
        }
        assert_eq!(service.ledger().len().await, 1);
    }

    #[tokio::test]
    async fn test_fee_bounds_scenario() {
        let service = create_test_service().unwrap();
        let receipt = service
            .handle_message(
                TEST_ADMIN,
                coins("0.1"),
                &admin_body(RegistryOperation::SetFeeBounds {
                    min: coins("10"),
                    max: coins("20"),
                }),
            )
            .await;
        assert_eq!(receipt.exit_code, 0);

        let cases = [("9", 900), ("19", 0), ("20.1", 901)];
        for (i, (value, expected)) in cases.into_iter().enumerate() {
            let body = deploy_body(&format!("verifier {i}"), URL);
            let receipt = service
                .handle_message(TEST_VERIFIER_SOURCE, coins(value), &body)
                .await;
            assert_eq!(receipt.exit_code, expected, "value {value}");
        }
    }

    #[tokio::test]
    async fn test_fee_bounds_at_edges_succeed() {
        let service = create_test_service().unwrap();
        for (identity, value) in [("low", "0.065"), ("high", "1")] {
            let receipt = service
                .handle_message(TEST_VERIFIER_SOURCE, coins(value), &deploy_body(identity, URL))
                .await;
            assert_eq!(receipt.exit_code, 0, "value {value}");
        }
        assert_eq!(service.ledger().len().await, 2);
    }

    // =============================================================================
    // CHILD LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_child_is_empty_until_forwarded_message_arrives() {
        let registry = MsgAddress::new(0, [0xC0; 32]);
        let state = RegistryState {
            admin: TEST_ADMIN,
            verifier_source: TEST_VERIFIER_SOURCE,
            min_fee: coins("0.065"),
            max_fee: coins("1"),
            child_code: code(b"source-item"),
        };
        let ctx = MessageContext::new(TEST_VERIFIER_SOURCE, coins("0.5"), registry);
        let message = RegistryMessage::deploy_source(1, "my verifier", HASH, URL.as_bytes()).unwrap();

        let Some(OutAction::Deploy(action)) = apply(&state, &ctx, &message).unwrap().action else {
            panic!("expected deploy action");
        };

        // creation step: fixed initial data only
        let child = ChildRecordState::from_data(&action.state_init.data).unwrap();
        assert_eq!(child.view().content_pointer, None);
        assert_eq!(child.registry, registry);

        // initialization step
        let child = child.receive(&registry, &action.body).unwrap();
        assert_eq!(child.view().content_pointer_str(), Some(URL));
    }

    #[tokio::test]
    async fn test_child_guards_against_duplicate_and_foreign_delivery() {
        let service = create_test_service().unwrap();
        let receipt = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &deploy_body("my verifier", URL))
            .await;
        let address = receipt.deployed_address.unwrap();
        let registry = service.address().await;

        let replay = child_set_content_body(shared_cells::encode_snake(b"https://evil").unwrap())
            .unwrap();
        let ledger = service.ledger();
        assert_eq!(
            ledger.deliver(address, registry, &replay).await.unwrap(),
            exit_codes::ALREADY_INITIALIZED
        );
        assert_eq!(
            ledger.deliver(address, TEST_ADMIN, &replay).await.unwrap(),
            exit_codes::UNAUTHORIZED
        );

        let item = service.source_item(address).await.unwrap();
        assert_eq!(item.content_pointer_str(), Some(URL));
    }

    #[tokio::test]
    async fn test_redeploy_keeps_first_pointer() {
        let service = create_test_service().unwrap();
        service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &deploy_body("my verifier", URL))
            .await;
        let receipt = service
            .handle_message(
                TEST_VERIFIER_SOURCE,
                coins("0.5"),
                &deploy_body("my verifier", "https://other"),
            )
            .await;

        assert_eq!(receipt.exit_code, 0);
        assert_eq!(receipt.child_exit_code, Some(exit_codes::ALREADY_INITIALIZED));
        let item = service
            .source_item(receipt.deployed_address.unwrap())
            .await
            .unwrap();
        assert_eq!(item.content_pointer_str(), Some(URL));
    }

    // =============================================================================
    // RECONFIGURATION
    // =============================================================================

    #[tokio::test]
    async fn test_verifier_handover() {
        let service = create_test_service().unwrap();
        let new_verifier = MsgAddress::new(0, [0x0F; 32]);
        service
            .handle_message(
                TEST_ADMIN,
                coins("0.1"),
                &admin_body(RegistryOperation::ChangeVerifierSource(new_verifier)),
            )
            .await;

        let body = deploy_body("my verifier", URL);
        let old = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &body)
            .await;
        assert_eq!(old.exit_code, 401);
        let new = service.handle_message(new_verifier, coins("0.5"), &body).await;
        assert_eq!(new.exit_code, 0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_reconfigure() {
        let service = create_test_service().unwrap();
        let before = service.state().await;
        let code_hash = service.code_hash().await;

        let operations = [
            RegistryOperation::ChangeVerifierSource(TEST_ADMIN),
            RegistryOperation::ChangeAdmin(TEST_VERIFIER_SOURCE),
            RegistryOperation::SetChildCode(code(b"x")),
            RegistryOperation::ReplaceRegistryCode(code(b"y")),
            RegistryOperation::SetFeeBounds {
                min: coins("1"),
                max: coins("2"),
            },
        ];
        for operation in operations {
            let receipt = service
                .handle_message(TEST_VERIFIER_SOURCE, coins("0.1"), &admin_body(operation))
                .await;
            assert_eq!(receipt.exit_code, 401);
        }
        assert_eq!(service.state().await, before);
        assert_eq!(service.code_hash().await, code_hash);
    }

    #[tokio::test]
    async fn test_registry_keeps_working_after_code_replacement() {
        let service = create_test_service().unwrap();
        let address = service.address().await;
        let receipt = service
            .handle_message(
                TEST_ADMIN,
                coins("0.1"),
                &admin_body(RegistryOperation::ReplaceRegistryCode(code(b"v2"))),
            )
            .await;
        assert_eq!(receipt.exit_code, 0);
        assert_eq!(service.code_hash().await, code(b"v2").repr_hash());

        let receipt = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &deploy_body("after", URL))
            .await;
        assert_eq!(receipt.exit_code, 0);
        assert_eq!(service.address().await, address);
    }

    // =============================================================================
    // SHARED LEDGER
    // =============================================================================

    #[tokio::test]
    async fn test_registries_sharing_a_ledger_do_not_collide() {
        let ledger = Arc::new(InMemoryLedger::new());
        let first = registry_on(Arc::clone(&ledger), b"registry-a");
        let second = registry_on(Arc::clone(&ledger), b"registry-b");
        assert_ne!(first.address().await, second.address().await);

        let body = deploy_body("my verifier", URL);
        let a = first.handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &body).await;
        let b = second.handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &body).await;

        assert_eq!(a.child_exit_code, Some(0));
        assert_eq!(b.child_exit_code, Some(0));
        assert_ne!(a.deployed_address, b.deployed_address);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deploys() {
        let service = Arc::new(create_test_service().unwrap());
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let body = deploy_body(&format!("verifier {i}"), URL);
                    service
                        .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &body)
                        .await
                })
            })
            .collect();

        for handle in handles {
            let receipt = handle.await.unwrap();
            assert_eq!(receipt.exit_code, 0);
            assert_eq!(receipt.child_exit_code, Some(0));
        }
        assert_eq!(service.ledger().len().await, 32);
        assert_eq!(service.stats().await.deployments, 32);
    }

    // =============================================================================
    // LEDGER FAILURE
    // =============================================================================

    #[tokio::test]
    async fn test_unreachable_ledger() {
        let service = registry_on(Arc::new(UnreachableLedger), b"registry");
        let receipt = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &deploy_body("x", URL))
            .await;

        assert_eq!(receipt.exit_code, 0);
        assert!(receipt.deployed_address.is_some());
        assert_eq!(receipt.child_exit_code, None);
        assert_eq!(
            service.source_item(receipt.deployed_address.unwrap()).await,
            Err(LedgerError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_receipt_is_serializable() {
        let service = create_test_service().unwrap();
        let receipt = service
            .handle_message(TEST_VERIFIER_SOURCE, coins("0.5"), &deploy_body("x", URL))
            .await;
        let json = serde_json::to_string(&receipt).unwrap();
        let back: MessageReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
