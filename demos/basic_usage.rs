//! Basic usage examples for Solkit
//!
//! Runs offline against a mock RPC node.

use solkit::prelude::*;
use solkit::rpc::MockSender;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== Solkit Basic Usage Examples ===\n");

    example_transfer()?;
    example_custom_instruction()?;
    example_serialization()?;
    example_rpc()?;

    Ok(())
}

fn example_transfer() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("Example 1: Signing a Transfer");
    println!("-----------------------------");

    let payer = Keypair::new();
    let recipient = PublicKey::new_unique();
    let blockhash = Hash::new_from_array([1u8; 32]);

    let mut tx = Transaction::new();
    tx.set_recent_blockhash(blockhash)?;
    tx.add_instructions([
        compute_budget::set_compute_unit_price(1_000)?,
        system::transfer(&payer.public_key, &recipient, 1_000_000)?,
    ])?;
    println!("  State before signing: {:?}", tx.state());

    tx.sign(&[payer.private_key.clone()])?;
    println!("  State after signing:  {:?}", tx.state());
    println!("  Verified: {}", tx.verify()?);

    let fee = tx.fee(&FeeCalculator::new(5_000, blockhash))?;
    println!("  Fee: {} lamports", fee);
    println!();

    Ok(())
}

fn example_custom_instruction() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("Example 2: Building a Custom Instruction");
    println!("----------------------------------------");

    let program_id = PublicKey::new_unique();
    let authority = PublicKey::new_unique();
    let vault = PublicKey::new_unique();

    let instruction = InstructionBuilder::new(program_id)
        .signer(authority, false)
        .writable(vault, false)
        .append_u8(3)
        .append_u64(250)
        .build();

    let message = Message::new(&[instruction], Hash::default())?;
    println!("  Header: {:?}", message.header);
    for (index, key) in message.account_keys.iter().enumerate() {
        println!(
            "  [{}] {} signer={} writable={}",
            index,
            key,
            message.is_signer(index),
            message.is_writable(index)
        );
    }
    println!("  Message bytes: {}", message.serialize()?.len());
    println!();

    Ok(())
}

fn example_serialization() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("Example 3: Wire Serialization");
    println!("-----------------------------");

    let payer = Keypair::new();
    let mut tx = Transaction::new_with_blockhash(
        vec![system::transfer(&payer.public_key, &PublicKey::new_unique(), 10)?],
        Hash::new_from_array([2u8; 32]),
    );
    tx.sign(&[payer.private_key.clone()])?;

    let bytes = tx.serialize()?;
    let decoded = CompiledTransaction::deserialize(&bytes)?;
    println!("  Size: {} bytes (limit {})", decoded.size(), solkit::transaction::PACKET_DATA_SIZE);
    println!("  Round trip identical: {}", decoded.serialize()? == bytes);
    println!("  Base58: {}", tx.to_base58()?);
    println!("  Base64: {}", tx.to_base64()?);
    println!();

    Ok(())
}

fn example_rpc() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("Example 4: RPC Client (mocked)");
    println!("------------------------------");

    let config = RpcClientConfig::for_network(Network::Devnet);
    println!("  Endpoint: {}", config.endpoint);
    let client = RpcClient::new_sender(MockSender::new("succeeds"), config);

    let payer = Keypair::new();
    println!("  Balance: {}", client.get_balance(&payer.public_key)?);

    let (blockhash, fee_calculator) = client.get_recent_blockhash()?;
    let mut tx = Transaction::new_with_blockhash(
        vec![system::transfer(&payer.public_key, &PublicKey::new_unique(), 10)?],
        blockhash,
    );
    tx.sign(&[payer.private_key.clone()])?;
    println!("  Fee: {} lamports", tx.fee(&fee_calculator)?);
    println!("  Submitted: {}", client.send_transaction(&tx)?);
    println!();

    Ok(())
}
