//! # /sign-stop エンドポイント
//!
//! ## 処理フロー
//! 1. リクエストボディを `SignStopRequest` としてパース
//! 2. バリデータでアドレス形式・ステーション一致を検証し、型付きの主張へ変換
//! 3. EIP-712ダイジェストを計算し、ステーション鍵で署名
//! 4. `{signature, signer}` を返却
//!
//! 検証は署名より前に完了し、拒否された主張に対して署名処理は一切行わない。
//! sessionIdのリプレイ対策は行わない（検証側コントラクトの責務）。

mod handler;


pub use handler::handle_sign_stop;
