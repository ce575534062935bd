//! # EV Station Signer CLI
//!
//! ステーション運用者向けのコマンドラインツール。
//!
//! ## サブコマンド
//! - `keygen` — 秘密鍵を生成し、アドレスと共に表示
//! - `address` — 秘密鍵からアドレスを表示
//! - `sign` — サーバーと同じ検証・署名をオフラインで実行
//! - `verify` — 署名から署名者をリカバリし、期待値と照合
//! - `request` — 稼働中のステーションに主張を送信

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use station_core::ClaimValidator;
use station_crypto::{
    parse_address, parse_signature, recover_signer, Address, SessionStopClaim, TypedDataSigner,
};
use station_types::{ErrorResponse, SignStopRequest, SignStopResponse};

#[derive(Parser)]
#[command(name = "station-cli", about = "EV Station Signer CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 新しいステーション秘密鍵を生成する
    Keygen,
    /// 秘密鍵に対応するアドレスを表示する
    Address {
        /// 16進数の秘密鍵
        #[arg(long)]
        key: String,
    },
    /// 主張ファイルにオフラインで署名する
    Sign {
        /// 16進数の秘密鍵
        #[arg(long)]
        key: String,
        /// /sign-stop と同じ形式のJSONファイル
        #[arg(long)]
        claim: PathBuf,
    },
    /// 署名から署名者をリカバリする
    Verify {
        /// /sign-stop と同じ形式のJSONファイル
        #[arg(long)]
        claim: PathBuf,
        /// `0x` 付き65バイト署名
        #[arg(long)]
        signature: String,
        /// 期待する署名者アドレス（省略時はclaim.station）
        #[arg(long)]
        signer: Option<String>,
    },
    /// 稼働中のステーションに主張を送信する
    Request {
        /// ステーションのベースURL
        #[arg(long, default_value = "http://localhost:3000")]
        endpoint: String,
        /// /sign-stop と同じ形式のJSONファイル
        #[arg(long)]
        claim: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Keygen => {
            let signer = station_crypto::random_signer();
            println!("private_key: {}", station_crypto::private_key_hex(&signer));
            println!("address:     {}", signer.address());
        }
        Command::Address { key } => {
            let signer = TypedDataSigner::from_private_key(&key)?;
            println!("{}", signer.address());
        }
        Command::Sign { key, claim } => {
            let signer = TypedDataSigner::from_private_key(&key)?;
            let request = load_request(&claim)?;
            let response = sign_request(&signer, &request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Verify {
            claim,
            signature,
            signer,
        } => {
            let request = load_request(&claim)?;
            let expected = signer.as_deref().map(parse_address).transpose()?;
            let recovered = verify_request(&request, &signature, expected)?;
            println!("OK: 署名者 {recovered}");
        }
        Command::Request { endpoint, claim } => {
            let request = load_request(&claim)?;
            let response = send_request(&endpoint, &request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// JSONファイルから主張を読み込む。
fn load_request(path: &Path) -> anyhow::Result<SignStopRequest> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("主張ファイルの読み込みに失敗: {}", path.display()))?;
    serde_json::from_slice(&bytes).context("主張ファイルのパースに失敗")
}

/// サーバーと同じ検証を経て署名する。
fn sign_request(
    signer: &TypedDataSigner,
    request: &SignStopRequest,
) -> anyhow::Result<SignStopResponse> {
    let claim = ClaimValidator::new(signer.address()).validate(request)?;
    let attestation = signer.sign_stop(&claim)?;
    Ok(SignStopResponse {
        signature: attestation.signature_hex(),
        signer: attestation.signer.to_checksum(None),
    })
}

/// 主張をclaim.stationを自ステーションとして型付きに変換する。
fn typed_claim(request: &SignStopRequest) -> anyhow::Result<SessionStopClaim> {
    let station = parse_address(&request.station).context("stationのアドレス形式が不正です")?;
    Ok(ClaimValidator::new(station).validate(request)?)
}

/// 署名者をリカバリし、期待値（省略時はclaim.station）と照合する。
fn verify_request(
    request: &SignStopRequest,
    signature: &str,
    expected: Option<Address>,
) -> anyhow::Result<Address> {
    let claim = typed_claim(request)?;
    let signature = parse_signature(signature)?;
    let recovered = recover_signer(&claim, &signature)?;
    let expected = expected.unwrap_or(claim.station);
    if recovered != expected {
        anyhow::bail!("署名者が一致しません: expected {expected}, recovered {recovered}");
    }
    Ok(recovered)
}

/// 稼働中のステーションの /sign-stop に主張を送信する。
async fn send_request(
    endpoint: &str,
    request: &SignStopRequest,
) -> anyhow::Result<SignStopResponse> {
    let url = format!("{}/sign-stop", endpoint.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(request)
        .send()
        .await
        .with_context(|| format!("{url} への送信に失敗"))?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|e| format!("エラーレスポンスのパースに失敗: {e}"));
        anyhow::bail!("ステーションがエラーを返しました: HTTP {status} - {message}");
    }

    response
        .json()
        .await
        .context("SignStopResponseのパースに失敗")
}
